/// Text inputs on the registration screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    QuickLogin,
}

impl Field {
    /// Tab order
    pub const ALL: [Field; 4] = [Field::FirstName, Field::LastName, Field::Email, Field::QuickLogin];

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email | Field::QuickLogin => "Email (before @)",
        }
    }

    fn index(&self) -> usize {
        match self {
            Field::FirstName => 0,
            Field::LastName => 1,
            Field::Email => 2,
            Field::QuickLogin => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
}

impl TextField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The four registration inputs and which one has focus
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    fields: [TextField; 4],
    focus: Option<Field>,
    max_len: usize,
}

impl RegistrationForm {
    pub fn new(max_len: usize) -> Self {
        Self {
            fields: Default::default(),
            focus: None,
            max_len,
        }
    }

    pub fn field(&self, field: Field) -> &TextField {
        &self.fields[field.index()]
    }

    /// Field contents with surrounding whitespace removed
    pub fn trimmed(&self, field: Field) -> &str {
        self.field(field).text().trim()
    }

    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Option<Field>) {
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        self.focus = Some(match self.focus {
            None => Field::ALL[0],
            Some(field) => Field::ALL[(field.index() + 1) % Field::ALL.len()],
        });
    }

    pub fn focus_prev(&mut self) {
        let last = Field::ALL.len() - 1;
        self.focus = Some(match self.focus {
            None => Field::ALL[last],
            Some(field) => Field::ALL[(field.index() + last) % Field::ALL.len()],
        });
    }

    /// Append to the focused field; ignored when nothing has focus or the
    /// field is full
    pub fn push_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let max_len = self.max_len;
        if let Some(field) = self.focused_mut() {
            if field.text.chars().count() < max_len {
                field.text.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.text.pop();
        }
    }

    /// Empty every field and drop focus
    pub fn clear(&mut self) {
        self.fields = Default::default();
        self.focus = None;
    }

    fn focused_mut(&mut self) -> Option<&mut TextField> {
        let index = self.focus?.index();
        Some(&mut self.fields[index])
    }
}
