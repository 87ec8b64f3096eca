// ============================================================================
// Module : theme
// ============================================================================
// Thème clair/sombre de l'application : deux palettes fixes et un état
// partagé détenu par la racine, passé par référence aux vues.
// ============================================================================

use std::fmt;

use ratatui::style::Color;

/// Jeu de couleurs d'un thème
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fond de l'écran
    pub bg: Color,
    /// Fond appuyé (onglets, lignes de détail)
    pub strong_bg: Color,
    /// Couleur du texte
    pub text: Color,
    /// Couleur d'accent (titres, onglet actif, courbe)
    pub accent: Color,
}

/// Palette sombre
pub const DARK: Palette = Palette {
    bg: Color::Rgb(47, 54, 64),
    strong_bg: Color::Rgb(24, 26, 30),
    text: Color::Rgb(245, 246, 250),
    accent: Color::Rgb(68, 189, 50),
};

/// Palette claire
pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(245, 245, 245),
    strong_bg: Color::Rgb(220, 221, 225),
    text: Color::Rgb(0, 0, 0),
    accent: Color::Rgb(68, 189, 50),
};

/// Callback notifié à chaque bascule de thème
type ThemeCallback = Box<dyn Fn(bool)>;

/// État du thème
///
/// Un seul exemplaire, détenu par App. Les vues lisent la palette,
/// seule la racine bascule. Démarre en clair, jamais persisté.
pub struct ThemeState {
    dark: bool,
    subscribers: Vec<ThemeCallback>,
}

impl ThemeState {
    pub fn new() -> Self {
        Self {
            dark: false,
            subscribers: Vec::new(),
        }
    }

    /// Lit le drapeau sombre
    pub fn read(&self) -> bool {
        self.dark
    }

    /// Palette active
    pub fn palette(&self) -> &'static Palette {
        if self.dark {
            &DARK
        } else {
            &LIGHT
        }
    }

    /// Bascule clair <-> sombre et notifie les abonnés
    pub fn toggle(&mut self) {
        self.dark = !self.dark;
        for callback in &self.subscribers {
            callback(self.dark);
        }
    }

    /// Enregistre un callback appelé à chaque bascule
    pub fn subscribe(&mut self, callback: impl Fn(bool) + 'static) {
        self.subscribers.push(Box::new(callback));
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeState")
            .field("dark", &self.dark)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_starts_light() {
        let theme = ThemeState::new();
        assert!(!theme.read());
        assert_eq!(theme.palette(), &LIGHT);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut theme = ThemeState::new();
        let initial = theme.read();

        theme.toggle();
        assert_eq!(theme.read(), !initial);
        assert_eq!(theme.palette(), &DARK);

        theme.toggle();
        assert_eq!(theme.read(), initial);
        assert_eq!(theme.palette(), &LIGHT);
    }

    #[test]
    fn test_subscribers_are_notified_with_new_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut theme = ThemeState::new();
        theme.subscribe(move |dark| sink.borrow_mut().push(dark));

        theme.toggle();
        theme.toggle();
        theme.toggle();

        assert_eq!(*seen.borrow(), vec![true, false, true]);
    }

    #[test]
    fn test_palettes_share_accent() {
        assert_eq!(DARK.accent, LIGHT.accent);
        assert_ne!(DARK.bg, LIGHT.bg);
    }
}
