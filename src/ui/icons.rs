pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const LINK: &str = "🔗";
    pub const FILE: &str = "📄";
    pub const RIGHT: &str = "➡️";
    pub const LEFT: &str = "⬅️";
    pub const CYCLE: &str = "🔁";
    pub const WRENCH: &str = "🔧";
}
