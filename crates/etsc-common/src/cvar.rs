// cvar.rs — dynamic variable tracking

use crate::common::{com_dprintf, com_printf};
use crate::q_shared::{CVAR_ARCHIVE, CVAR_ROM, CVAR_SERVERINFO, CVAR_USERINFO};

use std::collections::HashMap;

use parking_lot::Mutex;

/// A console variable.
#[derive(Clone, Debug)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub reset_string: String,
    pub flags: i32,
    pub modified: bool,
    pub value: f32,
    pub integer: i32,
}

impl Cvar {
    fn assign(&mut self, value: &str) {
        self.string = value.to_string();
        self.value = parse_value(value);
        self.integer = self.value as i32;
        self.modified = true;
    }
}

/// Numeric view of a cvar string, 0 when it does not parse.
fn parse_value(s: &str) -> f32 {
    s.trim().parse::<f32>().unwrap_or(0.0)
}

/// The full cvar system context.
#[derive(Default)]
pub struct CvarContext {
    pub cvar_vars: Vec<Cvar>,
    /// O(1) cvar lookup by name -> index in cvar_vars
    cvar_index: HashMap<String, usize>,
}

impl CvarContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that a string doesn't contain characters invalid in info strings.
    pub fn info_validate(s: &str) -> bool {
        !s.contains('\\') && !s.contains('"') && !s.contains(';')
    }

    /// Find a cvar by name, returning its index.
    pub fn find_var_index(&self, name: &str) -> Option<usize> {
        self.cvar_index.get(name).copied()
    }

    /// Find a cvar by name.
    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.cvar_index.get(name).map(|&idx| &self.cvar_vars[idx])
    }

    /// Get the floating-point value of a cvar. Returns 0 if not found.
    pub fn variable_value(&self, name: &str) -> f32 {
        self.find_var(name).map_or(0.0, |var| var.value)
    }

    /// Get the integer value of a cvar. Returns 0 if not found.
    pub fn variable_integer(&self, name: &str) -> i32 {
        self.find_var(name).map_or(0, |var| var.integer)
    }

    /// Get the string value of a cvar. Returns "" if not found.
    pub fn variable_string(&self, name: &str) -> &str {
        self.find_var(name).map_or("", |var| var.string.as_str())
    }

    /// Get or create a cvar. If it already exists, the value is not changed
    /// but flags are OR'd in.
    pub fn get(&mut self, name: &str, value: &str, flags: i32) -> Option<usize> {
        if flags & (CVAR_USERINFO | CVAR_SERVERINFO) != 0
            && (!Self::info_validate(name) || !Self::info_validate(value))
        {
            com_printf("invalid info cvar name or value\n");
            return None;
        }

        if let Some(&idx) = self.cvar_index.get(name) {
            let var = &mut self.cvar_vars[idx];
            var.flags |= flags;
            var.reset_string = value.to_string();
            return Some(idx);
        }

        let float_val = parse_value(value);
        let idx = self.cvar_vars.len();
        self.cvar_vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            reset_string: value.to_string(),
            flags,
            modified: true,
            value: float_val,
            integer: float_val as i32,
        });
        self.cvar_index.insert(name.to_string(), idx);

        Some(idx)
    }

    fn set2(&mut self, name: &str, value: &str, force: bool) -> Option<usize> {
        let idx = match self.find_var_index(name) {
            Some(idx) => idx,
            None => return self.get(name, value, 0),
        };

        let var = &mut self.cvar_vars[idx];

        if var.flags & (CVAR_USERINFO | CVAR_SERVERINFO) != 0 && !Self::info_validate(value) {
            com_dprintf("invalid info cvar value\n");
            return Some(idx);
        }

        if !force && var.flags & CVAR_ROM != 0 {
            com_dprintf(&format!("{} is read only.\n", name));
            return Some(idx);
        }

        if value == var.string {
            return Some(idx); // not changed
        }

        var.assign(value);
        Some(idx)
    }

    /// Set a cvar value (respects ROM).
    pub fn set(&mut self, name: &str, value: &str) -> Option<usize> {
        self.set2(name, value, false)
    }

    /// Force-set a cvar value (ignores ROM).
    pub fn force_set(&mut self, name: &str, value: &str) -> Option<usize> {
        self.set2(name, value, true)
    }

    /// Set a cvar from a float value.
    pub fn set_value(&mut self, name: &str, value: f32) {
        let val_str = if value == (value as i32) as f32 {
            format!("{}", value as i32)
        } else {
            format!("{}", value)
        };
        self.set(name, &val_str);
    }

    /// Restore a cvar to the default it was registered with.
    pub fn reset(&mut self, name: &str) {
        if let Some(reset) = self.find_var(name).map(|v| v.reset_string.clone()) {
            self.set(name, &reset);
        }
    }

    /// Returns and clears the modified flag.
    pub fn take_modified(&mut self, name: &str) -> bool {
        match self.find_var_index(name) {
            Some(idx) => std::mem::take(&mut self.cvar_vars[idx].modified),
            None => false,
        }
    }

    /// Handle variable inspection/changing from the console.
    /// Returns true if the command was a cvar reference.
    pub fn command(&mut self, argv: &[&str]) -> bool {
        let Some(&name) = argv.first() else {
            return false;
        };
        let Some(idx) = self.find_var_index(name) else {
            return false;
        };

        match argv.get(1) {
            None => {
                let var = &self.cvar_vars[idx];
                com_printf(&format!("\"{}\" is \"{}\" default: \"{}\"\n", var.name, var.string, var.reset_string));
            }
            Some(value) => {
                let name = self.cvar_vars[idx].name.clone();
                self.set(&name, value);
            }
        }
        true
    }

    /// Write all archived cvars to a writer.
    pub fn write_variables(&self, writer: &mut dyn std::io::Write) -> std::io::Result<()> {
        for var in &self.cvar_vars {
            if var.flags & CVAR_ARCHIVE != 0 {
                writeln!(writer, "seta {} \"{}\"", var.name, var.string)?;
            }
        }
        Ok(())
    }
}

// ============================================================
// Global singleton and free-function wrappers
// ============================================================

static CVAR_CTX: Mutex<Option<CvarContext>> = Mutex::new(None);

pub fn cvar_init() {
    *CVAR_CTX.lock() = Some(CvarContext::new());
}

pub fn cvar_shutdown() {
    *CVAR_CTX.lock() = None;
}

pub fn cvar_set(name: &str, value: &str) {
    if let Some(ref mut c) = *CVAR_CTX.lock() {
        c.set(name, value);
    }
}

/// Access the global CVAR_CTX with a closure. Returns None if not initialized.
pub fn with_cvar_ctx<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut CvarContext) -> R,
{
    CVAR_CTX.lock().as_mut().map(f)
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cvar_get_and_find() {
        let mut ctx = CvarContext::new();
        ctx.get("test_var", "42", 0);
        assert_eq!(ctx.variable_value("test_var"), 42.0);
        assert_eq!(ctx.variable_integer("test_var"), 42);
        assert_eq!(ctx.variable_string("test_var"), "42");
        assert_eq!(ctx.variable_string("missing"), "");
    }

    #[test]
    fn test_cvar_get_keeps_existing_value() {
        let mut ctx = CvarContext::new();
        ctx.get("name", "first", 0);
        ctx.get("name", "second", CVAR_ARCHIVE);
        let var = ctx.find_var("name").unwrap();
        assert_eq!(var.string, "first");
        assert_eq!(var.flags, CVAR_ARCHIVE);
    }

    #[test]
    fn test_cvar_set() {
        let mut ctx = CvarContext::new();
        ctx.get("test_var", "10", 0);
        ctx.set("test_var", "20");
        assert_eq!(ctx.variable_value("test_var"), 20.0);

        ctx.set("text_var", "Allies");
        assert_eq!(ctx.variable_value("text_var"), 0.0);
        assert_eq!(ctx.variable_string("text_var"), "Allies");
    }

    #[test]
    fn test_cvar_rom() {
        let mut ctx = CvarContext::new();
        ctx.get("test_var", "10", CVAR_ROM);
        ctx.set("test_var", "20");
        assert_eq!(ctx.variable_value("test_var"), 10.0);
        ctx.force_set("test_var", "20");
        assert_eq!(ctx.variable_value("test_var"), 20.0);
    }

    #[test]
    fn test_cvar_reset_and_modified() {
        let mut ctx = CvarContext::new();
        ctx.get("test_var", "1", 0);
        assert!(ctx.take_modified("test_var"));
        assert!(!ctx.take_modified("test_var"));

        ctx.set_value("test_var", 0.5);
        assert!(ctx.take_modified("test_var"));
        ctx.reset("test_var");
        assert_eq!(ctx.variable_string("test_var"), "1");
    }

    #[test]
    fn test_cvar_command() {
        let mut ctx = CvarContext::new();
        ctx.get("cg_test", "0", 0);
        assert!(ctx.command(&["cg_test", "1"]));
        assert_eq!(ctx.variable_integer("cg_test"), 1);
        assert!(!ctx.command(&["not_a_cvar", "1"]));
        assert!(!ctx.command(&[]));
    }

    #[test]
    fn test_write_variables() {
        let mut ctx = CvarContext::new();
        ctx.get("kept", "Axis Team", CVAR_ARCHIVE);
        ctx.get("skipped", "1", 0);
        let mut out = Vec::new();
        ctx.write_variables(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "seta kept \"Axis Team\"\n");
    }
}
