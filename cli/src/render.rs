use winmine_core::{Coord2, Phase, PlayEngine, Session};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ViewCell {
    Hidden,
    Revealed(u8),
    Flagged,
    QuestionMarked,
    TriggeredMine,
    Mine,
    Misflagged,
}

impl ViewCell {
    pub(crate) fn glyph(self) -> char {
        use ViewCell::*;
        match self {
            Hidden => '#',
            Revealed(0) => '.',
            Revealed(count) => char::from(b'0' + count),
            Flagged => 'F',
            QuestionMarked => '?',
            TriggeredMine => 'X',
            Mine => '*',
            Misflagged => 'x',
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Face {
    Smile,
    Cool,
    Dead,
}

impl Face {
    pub(crate) fn glyph(self) -> &'static str {
        match self {
            Self::Smile => ":)",
            Self::Cool => "B)",
            Self::Dead => "X(",
        }
    }
}

impl From<Phase> for Face {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Victory => Self::Cool,
            Phase::Defeat => Self::Dead,
            Phase::Idle | Phase::Running => Self::Smile,
        }
    }
}

pub(crate) fn format_for_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

/// What the player sees at `coords`. Finished games expose the mines.
pub(crate) fn view_cell(engine: &PlayEngine, coords: Coord2) -> ViewCell {
    let Some(cell) = engine.cell_at(coords) else {
        return ViewCell::Hidden;
    };
    let shown = if cell.is_revealed() {
        ViewCell::Revealed(cell.neighbor_mines())
    } else if cell.is_flagged() {
        ViewCell::Flagged
    } else if cell.is_questioned() {
        ViewCell::QuestionMarked
    } else {
        ViewCell::Hidden
    };

    match engine.phase() {
        Phase::Idle | Phase::Running => shown,
        Phase::Victory if cell.is_mine() => ViewCell::Flagged,
        Phase::Victory => shown,
        Phase::Defeat if engine.triggered_mine() == Some(coords) => ViewCell::TriggeredMine,
        Phase::Defeat if cell.is_mine() => match shown {
            ViewCell::Flagged => ViewCell::Flagged,
            _ => ViewCell::Mine,
        },
        Phase::Defeat => match shown {
            ViewCell::Flagged => ViewCell::Misflagged,
            other => other,
        },
    }
}

/// Status line: mines left, face, seconds.
pub(crate) fn status_line(session: &Session) -> String {
    format!(
        "{}  {}  {}",
        format_for_counter(session.mines_remaining()),
        Face::from(session.phase()).glyph(),
        format_for_counter(session.elapsed_secs().into()),
    )
}

pub(crate) fn render(session: &Session) -> String {
    let engine = session.engine();
    let (rows, cols) = engine.board().size();
    let header: String = (1..=cols).map(|col| format!("{:>3}", col)).collect();

    let mut out = format!("{}\n   {}\n", status_line(session), header);
    out.extend((0..rows).map(|row| {
        let cells: String = (0..cols)
            .map(|col| format!("{:>3}", view_cell(engine, (row, col)).glyph()))
            .collect();
        format!("{:>3}{}\n", row + 1, cells)
    }));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use winmine_core::Level;

    fn session(size: Coord2, mines: &[Coord2]) -> Session {
        let engine = PlayEngine::with_mines(size, mines, true).unwrap();
        let config = engine.config();
        Session::from_engine(Level::Custom(config), engine)
    }

    #[test]
    fn counter_is_clamped_to_three_digits() {
        assert_eq!(format_for_counter(-120), "-99");
        assert_eq!(format_for_counter(-99), "-99");
        assert_eq!(format_for_counter(-5), "-05");
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(42), "042");
        assert_eq!(format_for_counter(999), "999");
        assert_eq!(format_for_counter(1500), "999");
    }

    #[test]
    fn fresh_board_is_hidden() {
        let session = session((2, 3), &[(0, 0)]);
        assert_eq!(
            render(&session),
            "001  :)  000\n     1  2  3\n  1  #  #  #\n  2  #  #  #\n"
        );
    }

    #[test]
    fn marks_and_numbers_while_running() {
        let mut session = session((3, 3), &[(0, 0), (0, 2)]);
        session.reveal((2, 1));
        session.toggle_mark((0, 0));
        session.toggle_mark((0, 2));
        session.toggle_mark((0, 2));

        let engine = session.engine();
        assert_eq!(view_cell(engine, (0, 0)), ViewCell::Flagged);
        assert_eq!(view_cell(engine, (0, 2)), ViewCell::QuestionMarked);
        assert_eq!(view_cell(engine, (1, 1)), ViewCell::Revealed(2));
        assert_eq!(view_cell(engine, (2, 1)), ViewCell::Revealed(0));
        assert_eq!(status_line(&session), "001  :)  000");
    }

    #[test]
    fn defeat_exposes_mines_and_wrong_flags() {
        let mut session = session((3, 3), &[(0, 0), (0, 2), (2, 2)]);
        session.reveal((1, 1));
        session.toggle_mark((0, 0));
        session.toggle_mark((1, 0));
        session.reveal((2, 2));

        let engine = session.engine();
        assert_eq!(view_cell(engine, (2, 2)), ViewCell::TriggeredMine);
        assert_eq!(view_cell(engine, (0, 0)), ViewCell::Flagged);
        assert_eq!(view_cell(engine, (0, 2)), ViewCell::Mine);
        assert_eq!(view_cell(engine, (1, 0)), ViewCell::Misflagged);
        assert_eq!(view_cell(engine, (1, 1)), ViewCell::Revealed(3));
        assert_eq!(view_cell(engine, (2, 0)), ViewCell::Hidden);
        assert!(status_line(&session).contains("X("));
    }

    #[test]
    fn victory_flags_every_mine() {
        let mut session = session((1, 3), &[(0, 0)]);
        session.reveal((0, 2));

        assert_eq!(session.phase(), Phase::Victory);
        assert_eq!(view_cell(session.engine(), (0, 0)), ViewCell::Flagged);
        assert_eq!(status_line(&session), "001  B)  000");
    }
}
