use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::form::Field;

/// Clickable buttons on the registration screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Register,
    QuickLogin,
    Leaderboard,
}

impl Button {
    pub fn label(&self) -> &'static str {
        match self {
            Button::Register => "Play Game!",
            Button::QuickLogin => "Quick Login",
            Button::Leaderboard => "Leaderboard",
        }
    }
}

const FIELD_HEIGHT: u16 = 3;
const BUTTON_WIDTH: u16 = 17;

/// Cell rectangles of the registration screen
///
/// Shared by the renderer, which draws into these areas, and the controller,
/// which hit-tests pointer presses against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationLayout {
    pub title: Rect,
    pub new_member_header: Rect,
    pub returning_header: Rect,
    pub scores_header: Rect,
    pub instructions: Rect,
    fields: [(Field, Rect); 4],
    buttons: [(Button, Rect); 3],
}

impl RegistrationLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Title and subtitle
                Constraint::Min(0),    // Forms
                Constraint::Length(7), // Instructions
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(36),
                Constraint::Percentage(34),
                Constraint::Percentage(30),
            ])
            .split(rows[1]);

        let new_member = Self::stack(columns[0], 4);
        let returning = Self::stack(columns[1], 2);
        let scores = Self::stack(columns[2], 1);

        Self {
            title: rows[0],
            new_member_header: new_member[0],
            returning_header: returning[0],
            scores_header: scores[0],
            instructions: rows[2],
            fields: [
                (Field::FirstName, Self::padded(new_member[1])),
                (Field::LastName, Self::padded(new_member[2])),
                (Field::Email, Self::padded(new_member[3])),
                (Field::QuickLogin, Self::padded(returning[1])),
            ],
            buttons: [
                (Button::Register, Self::button(new_member[4])),
                (Button::QuickLogin, Self::button(returning[2])),
                (Button::Leaderboard, Self::button(scores[1])),
            ],
        }
    }

    pub fn field_rect(&self, field: Field) -> Rect {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, rect)| *rect)
            .unwrap_or_default()
    }

    pub fn button_rect(&self, button: Button) -> Rect {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, rect)| *rect)
            .unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, Rect)> + '_ {
        self.fields.iter().copied()
    }

    pub fn buttons(&self) -> impl Iterator<Item = (Button, Rect)> + '_ {
        self.buttons.iter().copied()
    }

    pub fn field_at(&self, column: u16, row: u16) -> Option<Field> {
        self.fields
            .iter()
            .find(|(_, rect)| hit(*rect, column, row))
            .map(|(field, _)| *field)
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        self.buttons
            .iter()
            .find(|(_, rect)| hit(*rect, column, row))
            .map(|(button, _)| *button)
    }

    /// Header line, `boxes` field-high slots, then slack
    fn stack(column: Rect, boxes: usize) -> Vec<Rect> {
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(std::iter::repeat(Constraint::Length(FIELD_HEIGHT)).take(boxes));
        constraints.push(Constraint::Min(0));

        Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(column)
            .to_vec()
    }

    fn padded(slot: Rect) -> Rect {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(2)])
            .split(slot)[1]
    }

    fn button(slot: Rect) -> Rect {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Min(0),
            ])
            .split(slot)[1]
    }
}

/// Whether a terminal cell falls inside `rect`
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(rect: Rect) -> (u16, u16) {
        (rect.x + rect.width / 2, rect.y + rect.height / 2)
    }

    #[test]
    fn test_button_centers_hit_their_button() {
        let layout = RegistrationLayout::compute(Rect::new(0, 0, 120, 40));

        for (button, rect) in layout.buttons() {
            assert!(rect.width > 0 && rect.height > 0);
            let (column, row) = center(rect);
            assert_eq!(layout.button_at(column, row), Some(button));
            assert_eq!(layout.field_at(column, row), None);
        }
    }

    #[test]
    fn test_field_centers_hit_their_field() {
        let layout = RegistrationLayout::compute(Rect::new(0, 0, 120, 40));

        for (field, rect) in layout.fields() {
            let (column, row) = center(rect);
            assert_eq!(layout.field_at(column, row), Some(field));
        }
    }

    #[test]
    fn test_title_area_hits_nothing() {
        let layout = RegistrationLayout::compute(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.button_at(0, 0), None);
        assert_eq!(layout.field_at(60, 1), None);
    }

    #[test]
    fn test_hit_edges() {
        let rect = Rect::new(10, 5, 4, 3);
        assert!(hit(rect, 10, 5));
        assert!(hit(rect, 13, 7));
        assert!(!hit(rect, 14, 7));
        assert!(!hit(rect, 13, 8));
        assert!(!hit(Rect::default(), 0, 0));
    }
}
