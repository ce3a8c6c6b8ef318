/// Available `:` commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "entries",
    aliases: &["e", "list", "ls"],
    description: "Show the watchlist",
  },
  Command {
    name: "add",
    aliases: &["a", "new"],
    description: "Add an entry",
  },
  Command {
    name: "delete",
    aliases: &["d", "del", "rm"],
    description: "Select entries to delete",
  },
  Command {
    name: "refresh",
    aliases: &["r", "sync"],
    description: "Force a refresh from the store",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit shelfmark",
  },
];

impl Command {
  /// Rank a match for this command. Lower is better; None filters the
  /// command out entirely.
  fn match_score(&self, input: &str) -> Option<u8> {
    if self.name == input {
      return Some(0);
    }
    if self.aliases.contains(&input) {
      return Some(1);
    }
    if self.name.starts_with(input) || self.aliases.iter().any(|a| a.starts_with(input)) {
      return Some(2);
    }
    if self.name.contains(input) {
      return Some(3);
    }
    None
  }
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.trim().to_lowercase();

  if input.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u8)> = COMMANDS
    .iter()
    .filter_map(|cmd| cmd.match_score(&input).map(|score| (cmd, score)))
    .collect();

  matches.sort_by_key(|(_, score)| *score);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match_wins() {
    let suggestions = get_suggestions("add");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "add");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("rm");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "delete");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("ref");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "refresh");
  }

  #[test]
  fn test_contains_match() {
    let suggestions = get_suggestions("ntri");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "entries");
  }

  #[test]
  fn test_no_match_is_empty() {
    assert!(get_suggestions("zzz").is_empty());
  }
}
