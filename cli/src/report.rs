use chordsweep_core::{BoardEvent, Cell, CellValue};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    Text,
    Json,
}

pub(crate) fn render(format: Format, event: &BoardEvent) -> serde_json::Result<String> {
    match format {
        Format::Text => Ok(describe(event)),
        Format::Json => serde_json::to_string(event),
    }
}

fn describe(event: &BoardEvent) -> String {
    use BoardEvent::*;
    match event {
        GameStarted => "game started".to_owned(),
        CellOpened(cell) => format!("opened {} {}", cell.coordinate(), value(cell)),
        CellFlagged(cell) => format!("flagged {}", cell.coordinate()),
        CellUnflagged(cell) => format!("unflagged {}", cell.coordinate()),
        CellFlaggedIncorrectly(cell) => format!("wrong flag {}", cell.coordinate()),
        FlagBudgetChanged(left) => format!("flags left: {left}"),
        GameWon => "game won".to_owned(),
        GameLost => "game lost".to_owned(),
    }
}

fn value(cell: &Cell) -> String {
    match cell.value() {
        CellValue::Mine => "mine".to_owned(),
        CellValue::Adjacent(n) => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordsweep_core::{Board, Coordinate, MineLayout, Rules};

    #[test]
    fn text_lines_name_the_cell() {
        let layout = MineLayout::from_rows(&["*.", ".."]).unwrap();
        let mut board = Board::with_layout(&layout, Rules::default());
        board.open(Coordinate::new(1, 1)).unwrap();
        board.toggle_flag(Coordinate::new(0, 0)).unwrap();

        let lines: Vec<_> = board
            .drain_events()
            .map(|event| render(Format::Text, &event).unwrap())
            .collect();

        assert_eq!(
            lines,
            vec![
                "game started",
                "opened (1, 1) 1",
                "flagged (0, 0)",
                "flags left: 0",
            ]
        );
    }

    #[test]
    fn json_lines_are_tagged() {
        let line = render(Format::Json, &BoardEvent::GameLost).unwrap();
        assert_eq!(line, r#"{"event":"game_lost"}"#);
    }
}
