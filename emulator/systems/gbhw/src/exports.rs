/// The export names of the gbhw core's web interface
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportNames {
    pub create: String,
    pub destroy: String,
    pub step: String,
    pub screen: String,
    pub screen_width: String,
    pub screen_height: String,
    pub set_button_state: String,
    pub malloc: String,
    pub free: String,
}

impl ExportNames {
    /// Names as exported by the core, each preceded by `prefix`.  Builds that keep the JS-style
    /// names use a prefix of `_`.
    pub fn with_prefix(prefix: &str) -> Self {
        let name = |base: &str| format!("{}{}", prefix, base);
        Self {
            create: name("gbhw_create_web"),
            destroy: name("gbhw_destroy"),
            step: name("gbhw_step"),
            screen: name("gbhw_get_screen_web"),
            screen_width: name("gbhw_get_screen_resolution_width"),
            screen_height: name("gbhw_get_screen_resolution_height"),
            set_button_state: name("gbhw_set_button_state"),
            malloc: name("malloc"),
            free: name("free"),
        }
    }
}

impl Default for ExportNames {
    fn default() -> Self {
        Self::with_prefix("")
    }
}

pub const MEMORY: &str = "memory";

/// Called once after instantiation if the core exports either of them
pub const INITIALIZERS: [&str; 2] = ["_initialize", "__wasm_call_ctors"];
