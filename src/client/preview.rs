use serde::Serialize;

use crate::models::PortfolioProject;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    pub fn dimensions(&self) -> PreviewDimensions {
        match self {
            Viewport::Desktop => PreviewDimensions {
                width: "100%",
                height: "500px",
                centered: false,
            },
            Viewport::Tablet => PreviewDimensions {
                width: "768px",
                height: "450px",
                centered: true,
            },
            Viewport::Mobile => PreviewDimensions {
                width: "375px",
                height: "667px",
                centered: true,
            },
        }
    }
}

/// CSS box of the preview frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewDimensions {
    pub width: &'static str,
    pub height: &'static str,
    pub centered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "src", rename_all = "lowercase")]
pub enum PreviewMode {
    Image(String),
    Iframe(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub mode: PreviewMode,
    pub dimensions: PreviewDimensions,
}

fn populated(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Picks what the editor shows for `project`: the first populated image among
/// carousel, main and preview, else the live site, else a placeholder.
pub fn render_preview(project: &PortfolioProject, viewport: Viewport) -> Preview {
    let image = populated(project.carousel_image_url.as_ref())
        .or_else(|| populated(project.image_url.as_ref()))
        .or_else(|| populated(project.preview_image_url.as_ref()));

    let mode = match image {
        Some(url) => PreviewMode::Image(url.clone()),
        None if !project.website_url.trim().is_empty() => PreviewMode::Iframe(project.website_url.clone()),
        None => PreviewMode::Empty,
    };

    Preview {
        mode,
        dimensions: viewport.dimensions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> PortfolioProject {
        PortfolioProject::new()
    }

    #[test]
    fn carousel_wins_over_other_images() {
        let mut p = project();
        p.image_url = Some("https://img/main.png".into());
        p.preview_image_url = Some("https://img/thumb.png".into());
        p.carousel_image_url = Some("https://img/wide.png".into());
        p.website_url = "https://client.example".into();

        let preview = render_preview(&p, Viewport::Desktop);
        assert_eq!(preview.mode, PreviewMode::Image("https://img/wide.png".into()));
    }

    #[test]
    fn main_image_wins_over_preview_image() {
        let mut p = project();
        p.image_url = Some("https://img/main.png".into());
        p.preview_image_url = Some("https://img/thumb.png".into());
        p.carousel_image_url = Some(String::new());

        let preview = render_preview(&p, Viewport::Tablet);
        assert_eq!(preview.mode, PreviewMode::Image("https://img/main.png".into()));
    }

    #[test]
    fn preview_image_alone_is_shown() {
        let mut p = project();
        p.preview_image_url = Some("https://img/thumb.png".into());

        assert_eq!(
            render_preview(&p, Viewport::Mobile).mode,
            PreviewMode::Image("https://img/thumb.png".into())
        );
    }

    #[test]
    fn website_is_framed_without_images() {
        let mut p = project();
        p.website_url = "https://client.example".into();

        assert_eq!(
            render_preview(&p, Viewport::Desktop).mode,
            PreviewMode::Iframe("https://client.example".into())
        );
    }

    #[test]
    fn nothing_to_show_is_empty() {
        assert_eq!(render_preview(&project(), Viewport::Desktop).mode, PreviewMode::Empty);
    }

    #[test]
    fn viewport_dimensions() {
        let d = Viewport::Desktop.dimensions();
        assert_eq!((d.width, d.height, d.centered), ("100%", "500px", false));
        let t = Viewport::Tablet.dimensions();
        assert_eq!((t.width, t.height, t.centered), ("768px", "450px", true));
        let m = Viewport::Mobile.dimensions();
        assert_eq!((m.width, m.height, m.centered), ("375px", "667px", true));
    }
}
