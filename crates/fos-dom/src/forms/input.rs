//! Input element types

/// HTML input types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Tel,
    Url,
    Search,
    Date,
    Time,
    DatetimeLocal,
    Month,
    Week,
    Color,
    Range,
    File,
    Hidden,
    Checkbox,
    Radio,
    Submit,
    Reset,
    Button,
    Image,
}

impl InputType {
    /// Parse the `type` attribute. Unknown values fall back to text.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "password" => Self::Password,
            "email" => Self::Email,
            "number" => Self::Number,
            "tel" => Self::Tel,
            "url" => Self::Url,
            "search" => Self::Search,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime-local" => Self::DatetimeLocal,
            "month" => Self::Month,
            "week" => Self::Week,
            "color" => Self::Color,
            "range" => Self::Range,
            "file" => Self::File,
            "hidden" => Self::Hidden,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "button" => Self::Button,
            "image" => Self::Image,
            _ => Self::Text,
        }
    }

    /// Types whose value is free text (length and pattern apply)
    pub fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Password | Self::Email |
                       Self::Tel | Self::Url | Self::Search)
    }

    pub fn is_button(&self) -> bool {
        matches!(self, Self::Submit | Self::Reset | Self::Button | Self::Image)
    }

    pub fn is_checkable(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }

    /// Whether the `required` attribute applies to this type
    pub fn supports_required(&self) -> bool {
        !self.is_button() && !matches!(self, Self::Hidden | Self::Range | Self::Color)
    }

    /// Whether controls of this type take part in constraint validation
    pub fn participates_in_validation(&self) -> bool {
        !self.is_button() && *self != Self::Hidden
    }

    /// Whether `readonly` applies (and therefore bars validation)
    pub fn supports_readonly(&self) -> bool {
        self.is_text_like() || matches!(self, Self::Number | Self::Date | Self::Time |
            Self::DatetimeLocal | Self::Month | Self::Week)
    }
}
