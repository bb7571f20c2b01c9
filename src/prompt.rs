use std::env;

use mintsh::display::{paint, Color};

/// Render `user@host:cwd > ` for the next read.
pub(crate) fn render() -> String {
    let user = env::var("USER").unwrap_or_else(|_| "user".to_string());
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cwd = env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "?".to_string());

    format!(
        "{}:{} {}{}",
        paint(Color::MintGreen, &format!("{user}@{host}")),
        paint(Color::Cyan, &cwd),
        Color::Bold.code(),
        paint(Color::BrightGreen, "> "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_user_and_cwd() {
        let rendered = render();
        assert!(rendered.contains('@'));
        assert!(rendered.contains("> "));
    }
}
