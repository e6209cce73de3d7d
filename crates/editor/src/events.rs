//! Keyboard shortcuts handled by the session.

/// Keyboard modifier flags for key events.
#[derive(Copy, Clone, Debug, Default)]
pub struct KeyMods {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Session-level actions bound to shortcuts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    ExitPicking,
}

/// Map a keydown to its bound action, if any. Bindings follow the usual
/// editor conventions: Ctrl+Z, Ctrl+Shift+Z / Ctrl+Y, Escape.
pub fn shortcut_for(key: &str, mods: KeyMods) -> Option<Shortcut> {
    if key.eq_ignore_ascii_case("escape") {
        return Some(Shortcut::ExitPicking);
    }
    if !mods.ctrl || mods.alt {
        return None;
    }
    match key {
        "z" | "Z" if mods.shift => Some(Shortcut::Redo),
        "z" | "Z" => Some(Shortcut::Undo),
        "y" | "Y" => Some(Shortcut::Redo),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: KeyMods = KeyMods {
        ctrl: true,
        alt: false,
        shift: false,
    };

    #[test]
    fn standard_bindings() {
        assert_eq!(shortcut_for("z", CTRL), Some(Shortcut::Undo));
        assert_eq!(
            shortcut_for("Z", KeyMods { shift: true, ..CTRL }),
            Some(Shortcut::Redo)
        );
        assert_eq!(shortcut_for("y", CTRL), Some(Shortcut::Redo));
        assert_eq!(
            shortcut_for("Escape", KeyMods::default()),
            Some(Shortcut::ExitPicking)
        );
    }

    #[test]
    fn unbound_keys_pass_through() {
        assert_eq!(shortcut_for("z", KeyMods::default()), None);
        assert_eq!(shortcut_for("x", CTRL), None);
        // Ctrl+Alt+Z is AltGr territory on some layouts, leave it alone.
        assert_eq!(shortcut_for("z", KeyMods { alt: true, ..CTRL }), None);
    }
}
