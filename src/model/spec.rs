/// Hotspot on the 24-unit design grid. Values are already in grid pixels,
/// so scaling is a plain multiplication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CursorSpec {
    Static {
        name: String,
        hotspot: Hotspot,
    },
    Animated {
        name: String,
        hotspot: Hotspot,
        frame_count: u32,
        frame_delay_ms: u32,
    },
}

impl CursorSpec {
    pub fn name(&self) -> &str {
        match self {
            CursorSpec::Static { name, .. } | CursorSpec::Animated { name, .. } => name,
        }
    }

    pub fn hotspot(&self) -> Hotspot {
        match self {
            CursorSpec::Static { hotspot, .. } | CursorSpec::Animated { hotspot, .. } => *hotspot,
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, CursorSpec::Animated { .. })
    }

    pub fn info(&self) -> String {
        let Hotspot { x, y } = self.hotspot();
        match self {
            CursorSpec::Static { name, .. } => format!("{} (static) - hotspot {},{}", name, x, y),
            CursorSpec::Animated {
                name,
                frame_count,
                frame_delay_ms,
                ..
            } => format!(
                "{} ({} frames @ {}ms) - hotspot {},{}",
                name, frame_count, frame_delay_ms, x, y
            ),
        }
    }
}
