//! Shared UI icons and emojis.
//!
//! Every icon has a plain-text fallback for terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[i]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// Entity indicators
pub static BARCODE: Emoji<'_, '_> = Emoji("🏷️  ", "#");
pub static TROLLEY: Emoji<'_, '_> = Emoji("🛒 ", "[T]");
pub static PROCESS: Emoji<'_, '_> = Emoji("🏭 ", "[P]");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "<->");
pub static USER: Emoji<'_, '_> = Emoji("👤 ", "[U]");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "[S]");

// Timeline indicators
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "[T]");
pub static HISTORY: Emoji<'_, '_> = Emoji("📜 ", "[H]");
