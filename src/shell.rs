use crate::board::Square;
use crate::game::Game;
use crate::movegen::GameState;
use anyhow::Result;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
commands:
  e2e4          play a move by its coordinates
  moves [sq]    list legal moves, or destinations from a square
  board | d     show the board
  undo | z      take back the last move
  reset | r     start a new game
  quit          leave
";

/// Line-oriented terminal front-end over a `Game`.
pub struct Shell {
    game: Game,
    echo_board: bool, // print the board after every move
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            game: Game::new(),
            echo_board: true,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        print!("{}", self.show_board());
        stdout.flush()?;

        while reader.read_line(&mut line)? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }

            let response = self.handle_command(command)?;
            print!("{}", response);
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok("".to_string());
        }

        match parts[0] {
            "help" => Ok(HELP.to_string()),
            "board" | "d" => Ok(self.show_board()),
            "moves" => Ok(self.handle_moves(&parts[1..])),
            "undo" | "z" => Ok(self.handle_undo()),
            "reset" | "r" => {
                self.game.reset();
                Ok(format!("new game\n{}", self.show_board()))
            }
            "quit" => Ok("".to_string()),
            notation => Ok(self.handle_move(notation)),
        }
    }

    fn show_board(&self) -> String {
        let position = self.game.position();
        format!("{}{:?} to move\n", position.board(), position.side_to_move())
    }

    fn handle_moves(&self, parts: &[&str]) -> String {
        let listed: Vec<String> = match parts.first() {
            Some(square) => match square.parse::<Square>() {
                Ok(from) => self
                    .game
                    .legal_destinations(from)
                    .iter()
                    .map(Square::to_string)
                    .collect(),
                Err(err) => return format!("error: {}\n", err),
            },
            None => self.game.legal_moves().iter().map(|mv| mv.notation()).collect(),
        };

        if listed.is_empty() {
            "(none)\n".to_string()
        } else {
            format!("{}\n", listed.join(" "))
        }
    }

    fn handle_undo(&mut self) -> String {
        match self.game.undo() {
            Some(mv) if self.echo_board => format!("undo {}\n{}", mv, self.show_board()),
            Some(mv) => format!("undo {}\n", mv),
            None => "nothing to undo\n".to_string(),
        }
    }

    fn handle_move(&mut self, notation: &str) -> String {
        let state = match self.game.play_notation(notation) {
            Ok(state) => state,
            Err(err) => return format!("error: {}\n", err),
        };

        let mut response = format!("{}\n", notation);
        if self.echo_board {
            response.push_str(&self.show_board());
        }
        match state {
            GameState::Checkmate(winner) => response.push_str(&format!("CHECKMATE, {:?} wins\n", winner)),
            GameState::Stalemate => response.push_str("STALEMATE\n"),
            GameState::Ongoing if self.game.in_check() => response.push_str("check\n"),
            GameState::Ongoing => {}
        }
        response
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_and_undoes_moves() {
        let mut shell = Shell::new();
        let response = shell.handle_command("e2e4").unwrap();
        assert!(response.starts_with("e2e4\n"));
        assert!(response.contains("Black to move"));

        let response = shell.handle_command("z").unwrap();
        assert!(response.starts_with("undo e2e4\n"));
        assert!(shell.game().history().is_empty());

        assert_eq!(shell.handle_command("undo").unwrap(), "nothing to undo\n");
    }

    #[test]
    fn illegal_input_is_reported_not_fatal() {
        let mut shell = Shell::new();
        let response = shell.handle_command("e2e5").unwrap();
        assert!(response.starts_with("error: invalid move e2e5"));
        let response = shell.handle_command("moves z9").unwrap();
        assert!(response.starts_with("error: invalid square"));
    }

    #[test]
    fn lists_destinations() {
        let mut shell = Shell::new();
        assert_eq!(shell.handle_command("moves b1").unwrap(), "a3 c3\n");
        assert_eq!(shell.handle_command("moves e1").unwrap(), "(none)\n");
        assert_eq!(shell.handle_command("moves").unwrap().split_whitespace().count(), 20);
    }

    #[test]
    fn announces_checkmate() {
        let mut shell = Shell::new();
        for notation in ["f2f3", "e7e5", "g2g4"] {
            shell.handle_command(notation).unwrap();
        }
        let response = shell.handle_command("d8h4").unwrap();
        assert!(response.ends_with("CHECKMATE, Black wins\n"));
        let response = shell.handle_command("a2a3").unwrap();
        assert!(response.starts_with("error: game is over"));
    }

    #[test]
    fn reset_starts_over() {
        let mut shell = Shell::new();
        shell.handle_command("d2d4").unwrap();
        let response = shell.handle_command("r").unwrap();
        assert!(response.starts_with("new game\n"));
        assert!(shell.game().history().is_empty());
        assert_eq!(shell.handle_command("").unwrap(), "");
    }
}
