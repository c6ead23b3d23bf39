use animator::{Display, Position, RenderTarget};
use hexpr_core::Corner;
use owo_colors::OwoColorize;

/// Prints the word display to stdout whenever it changes. Corner positions
/// are only remembered.
#[derive(Debug, Default)]
pub struct ConsoleTarget {
    positions: [Option<Position>; 8],
    last_shown: Option<Display>,
}

impl ConsoleTarget {
    pub fn position_of(&self, corner: Corner) -> Option<Position> {
        self.positions[corner.index()]
    }

    pub fn last_shown(&self) -> Option<&Display> {
        self.last_shown.as_ref()
    }
}

impl RenderTarget for ConsoleTarget {
    fn place_corner(&mut self, corner: Corner, position: Position) {
        self.positions[corner.index()] = Some(position);
    }

    fn show(&mut self, display: &Display) {
        if self.last_shown.as_ref() == Some(display) {
            return;
        }

        println!("{}", describe(display));
        self.last_shown = Some(display.clone());
    }
}

pub fn describe(display: &Display) -> String {
    match display {
        Display::TopWord(word) => format!("{} {}", "word".dimmed(), word.bold().green()),
        Display::SeedLabel(label) if label.is_empty() => format!("{}", "turning".dimmed()),
        Display::SeedLabel(label) => format!("{} {}", "turning".dimmed(), label.yellow()),
    }
}
