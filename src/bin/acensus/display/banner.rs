use std::io::{self, Write};
use std::sync::LazyLock;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const BANNER_ART: &str = r#"
    ___   ______ ______ _   __
   /   | /_  __//_  __// | / /
  / /| |  / /    / /  /  |/ /
 / ___ | / /    / /  / /|  /
/_/  |_|/_/    /_/  /_/ |_/
          ______ ______ _   __ _____  __  __ _____
         / ____// ____// | / // ___/ / / / // ___/
        / /    / __/  /  |/ / \__ \ / / / / \__ \
       / /___ / /___ / /|  / ___/ // /_/ / ___/ /
       \____//_____//_/ |_/ /____/ \____/ /____/

   ───────────────────────────────────────────────────────────
      attention  ·  bond probabilities  ·  distance curves
   ───────────────────────────────────────────────────────────
   "#;

static BANNER_FOR_HELP: LazyLock<String> = LazyLock::new(|| format!("\n{BANNER_ART}"));

pub fn banner_for_help() -> &'static str {
    &BANNER_FOR_HELP
}

pub fn print_banner() {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "{BANNER_ART}");
    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "   Element-Pair Attention Census                       v{VERSION}"
    );
    let _ = writeln!(stderr);
}
