use crate::model::list::ColorId;

/// Presentation tokens for one color, as CSS utility class strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: &'static str,
    pub bg_soft: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub icon: &'static str,
}

const ROSE: Theme = Theme {
    bg: "bg-rose-500",
    bg_soft: "bg-rose-50",
    text: "text-rose-700",
    border: "border-rose-200",
    accent: "bg-rose-500 hover:bg-rose-600",
    icon: "text-rose-500",
};

const BLUE: Theme = Theme {
    bg: "bg-blue-500",
    bg_soft: "bg-blue-50",
    text: "text-blue-700",
    border: "border-blue-200",
    accent: "bg-blue-500 hover:bg-blue-600",
    icon: "text-blue-500",
};

const GREEN: Theme = Theme {
    bg: "bg-emerald-500",
    bg_soft: "bg-emerald-50",
    text: "text-emerald-700",
    border: "border-emerald-200",
    accent: "bg-emerald-500 hover:bg-emerald-600",
    icon: "text-emerald-500",
};

const AMBER: Theme = Theme {
    bg: "bg-amber-500",
    bg_soft: "bg-amber-50",
    text: "text-amber-700",
    border: "border-amber-200",
    accent: "bg-amber-500 hover:bg-amber-600",
    icon: "text-amber-500",
};

const VIOLET: Theme = Theme {
    bg: "bg-violet-500",
    bg_soft: "bg-violet-50",
    text: "text-violet-700",
    border: "border-violet-200",
    accent: "bg-violet-500 hover:bg-violet-600",
    icon: "text-violet-500",
};

const CYAN: Theme = Theme {
    bg: "bg-cyan-500",
    bg_soft: "bg-cyan-50",
    text: "text-cyan-700",
    border: "border-cyan-200",
    accent: "bg-cyan-500 hover:bg-cyan-600",
    icon: "text-cyan-500",
};

// bg_soft is one step darker than the others so it shows on white
const SLATE: Theme = Theme {
    bg: "bg-slate-500",
    bg_soft: "bg-slate-100",
    text: "text-slate-700",
    border: "border-slate-200",
    accent: "bg-slate-500 hover:bg-slate-600",
    icon: "text-slate-500",
};

/// Look up the tokens for a color
pub fn theme(color: ColorId) -> &'static Theme {
    match color {
        ColorId::Rose => &ROSE,
        ColorId::Blue => &BLUE,
        ColorId::Green => &GREEN,
        ColorId::Amber => &AMBER,
        ColorId::Violet => &VIOLET,
        ColorId::Cyan => &CYAN,
        ColorId::Slate => &SLATE,
    }
}

/// Colors offered when creating a list; slate is reserved for tag views
pub fn selectable_colors() -> impl Iterator<Item = ColorId> {
    ColorId::ALL.into_iter().filter(|c| *c != ColorId::Slate)
}
