use console::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Purple,
    Blue,
    Green,
}

impl Color {
    fn to_console(self) -> console::Color {
        match self {
            Color::Purple => console::Color::Magenta,
            Color::Blue => console::Color::Blue,
            Color::Green => console::Color::Green,
        }
    }
}

/// Style token attached to one `%c` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldStyle {
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Color>,
}

impl FieldStyle {
    pub const PLAIN: FieldStyle = FieldStyle { bold: false, italic: false, color: None };
    pub const BOLD: FieldStyle = FieldStyle { bold: true, italic: false, color: None };

    pub const fn colored(color: Color) -> Self {
        FieldStyle { bold: false, italic: false, color: Some(color) }
    }

    pub fn to_console(&self) -> Style {
        let mut style = Style::new();
        if self.bold {
            style = style.bold();
        }
        if self.italic {
            style = style.italic();
        }
        if let Some(color) = self.color {
            style = style.fg(color.to_console());
        }
        style
    }
}

const ACTOR_ID: FieldStyle = FieldStyle { bold: false, italic: true, color: Some(Color::Purple) };

pub struct ActionStyle {
    pub prefix: FieldStyle,
    pub actor: FieldStyle,
    pub actor_id: FieldStyle,
    pub action_name: FieldStyle,
    pub event_arguments: FieldStyle,
}

pub struct UpdateStyle {
    pub prefix: FieldStyle,
    pub actor: FieldStyle,
    pub actor_id: FieldStyle,
    pub key: FieldStyle,
    pub new_value: FieldStyle,
}

pub struct ComputedStyle {
    pub prefix: FieldStyle,
    pub actor: FieldStyle,
    pub actor_id: FieldStyle,
    pub key: FieldStyle,
}

pub const ACTION_STYLE: ActionStyle = ActionStyle {
    prefix: FieldStyle::BOLD,
    actor: FieldStyle::PLAIN,
    actor_id: ACTOR_ID,
    action_name: FieldStyle::BOLD,
    event_arguments: FieldStyle::colored(Color::Blue),
};

pub const UPDATE_STYLE: UpdateStyle = UpdateStyle {
    prefix: FieldStyle::BOLD,
    actor: FieldStyle::PLAIN,
    actor_id: ACTOR_ID,
    key: FieldStyle::BOLD,
    new_value: FieldStyle::colored(Color::Green),
};

pub const COMPUTED_STYLE: ComputedStyle = ComputedStyle {
    prefix: FieldStyle::BOLD,
    actor: FieldStyle::PLAIN,
    actor_id: ACTOR_ID,
    key: FieldStyle::BOLD,
};

