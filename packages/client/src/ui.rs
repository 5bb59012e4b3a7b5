//! Terminal prompt helpers.

use std::io::Write;

/// Re-print the input prompt after asynchronous output interrupted it
pub fn redisplay_prompt(nickname: &str) {
    print!("{}> ", nickname);
    let _ = std::io::stdout().flush();
}
