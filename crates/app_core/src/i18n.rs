//! Internationalization support using Fluent

use fluent::{FluentArgs, FluentBundle, FluentResource};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

/// Translations shipped inside the binary
const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("en", include_str!("../../../assets/locales/en/gallery.ftl")),
    ("vi", include_str!("../../../assets/locales/vi/gallery.ftl")),
];

/// Localization manager
pub struct I18n {
    bundles: RwLock<HashMap<String, Arc<FluentBundle<FluentResource>>>>,
    current_locale: RwLock<String>,
    fallback_locale: String,
}

impl I18n {
    /// Create an empty I18n manager with the given locale selected
    pub fn new(default_locale: &str) -> Self {
        Self {
            bundles: RwLock::new(HashMap::new()),
            current_locale: RwLock::new(default_locale.to_string()),
            fallback_locale: "en".to_string(),
        }
    }

    /// Create a manager with the bundled translations loaded
    pub fn builtin(locale: &str) -> anyhow::Result<Self> {
        let i18n = Self::new(locale);
        for (name, source) in BUILTIN_LOCALES {
            i18n.add_locale_source(name, source.to_string())?;
        }

        if !i18n.set_locale(locale) {
            tracing::warn!("Unknown locale {}, falling back to {}", locale, i18n.fallback_locale);
            *i18n.current_locale.write() = i18n.fallback_locale.clone();
        }

        Ok(i18n)
    }

    /// Load translations from a directory of `<locale>/*.ftl`, replacing
    /// any bundle of the same locale
    pub fn load_from_dir(&self, dir: &Path) -> anyhow::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                let Some(locale) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };

                self.load_locale(locale, &path)?;
            }
        }

        Ok(())
    }

    fn load_locale(&self, locale: &str, dir: &Path) -> anyhow::Result<()> {
        let mut sources = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ftl") {
                sources.push(std::fs::read_to_string(&path)?);
            }
        }

        let mut bundle = Self::new_bundle(locale)?;
        for content in sources {
            Self::add_resource(&mut bundle, content)?;
        }

        self.bundles.write().insert(locale.to_string(), Arc::new(bundle));
        tracing::info!("Loaded locale: {}", locale);

        Ok(())
    }

    fn add_locale_source(&self, locale: &str, content: String) -> anyhow::Result<()> {
        let mut bundle = Self::new_bundle(locale)?;
        Self::add_resource(&mut bundle, content)?;
        self.bundles.write().insert(locale.to_string(), Arc::new(bundle));
        Ok(())
    }

    fn new_bundle(locale: &str) -> anyhow::Result<FluentBundle<FluentResource>> {
        let lang_id: LanguageIdentifier = locale
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid locale {}: {}", locale, e))?;

        let mut bundle = FluentBundle::new(vec![lang_id]);
        // Labels are drawn by egui, which renders bidi isolation marks as boxes
        bundle.set_use_isolating(false);
        Ok(bundle)
    }

    fn add_resource(bundle: &mut FluentBundle<FluentResource>, content: String) -> anyhow::Result<()> {
        let resource = FluentResource::try_new(content)
            .map_err(|(_, errors)| anyhow::anyhow!("Fluent parse errors: {:?}", errors))?;

        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("Fluent bundle errors: {:?}", errors))
    }

    /// Set the current locale
    pub fn set_locale(&self, locale: &str) -> bool {
        if self.bundles.read().contains_key(locale) {
            *self.current_locale.write() = locale.to_string();
            true
        } else {
            false
        }
    }

    /// Get the current locale
    pub fn current_locale(&self) -> String {
        self.current_locale.read().clone()
    }

    /// Get a localized string
    pub fn get(&self, key: &str) -> String {
        self.get_with_args(key, None)
    }

    /// Get a localized string with arguments.
    ///
    /// Falls back to the fallback locale, then to the key itself.
    pub fn get_with_args(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let bundles = self.bundles.read();
        let current = self.current_locale.read().clone();

        let mut locales = vec![current.as_str()];
        if current != self.fallback_locale {
            locales.push(self.fallback_locale.as_str());
        }

        for locale in locales {
            let Some(bundle) = bundles.get(locale) else {
                continue;
            };
            let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
                continue;
            };

            let mut errors = Vec::new();
            let result = bundle.format_pattern(pattern, args, &mut errors);
            if errors.is_empty() {
                return result.to_string();
            }
        }

        key.to_string()
    }

    /// Get available locales
    pub fn available_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.bundles.read().keys().cloned().collect();
        locales.sort();
        locales
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new("vi")
    }
}

/// Convenience macro for getting localized strings
#[macro_export]
macro_rules! t {
    ($i18n:expr, $key:expr) => {
        $i18n.get($key)
    };
    ($i18n:expr, $key:expr, $($arg_name:ident = $arg_value:expr),+ $(,)?) => {{
        let mut args = fluent::FluentArgs::new();
        $(
            args.set(stringify!($arg_name), $arg_value);
        )+
        $i18n.get_with_args($key, Some(&args))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_vietnamese() {
        let i18n = I18n::builtin("vi").unwrap();
        assert_eq!(i18n.current_locale(), "vi");
        assert_eq!(t!(i18n, "story-show"), "Hiện Mô tả");
        assert_eq!(t!(i18n, "original-hide"), "Xem Đã xử lý");
        assert_eq!(t!(i18n, "source-article"), "Bài viết gốc");
    }

    #[test]
    fn test_fallback_to_english() {
        let i18n = I18n::builtin("vi").unwrap();
        // Only present in the English bundle
        assert_eq!(
            t!(i18n, "image-missing", path = "/a.png"),
            "Image unavailable: /a.png"
        );
        assert_eq!(i18n.get("no-such-key"), "no-such-key");
    }

    #[test]
    fn test_unknown_locale_selects_fallback() {
        let i18n = I18n::builtin("fr").unwrap();
        assert_eq!(i18n.current_locale(), "en");
        assert_eq!(t!(i18n, "story-hide"), "Hide Story");
    }

    #[test]
    fn test_arguments() {
        let i18n = I18n::builtin("en").unwrap();
        assert_eq!(t!(i18n, "gallery-position", current = 3, total = 20), "3 / 20");
    }

    #[test]
    fn test_load_from_dir_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let vi = dir.path().join("vi");
        std::fs::create_dir(&vi).unwrap();
        std::fs::write(vi.join("custom.ftl"), "story-show = Xem câu chuyện\n").unwrap();

        let i18n = I18n::builtin("vi").unwrap();
        i18n.load_from_dir(dir.path()).unwrap();
        assert_eq!(t!(i18n, "story-show"), "Xem câu chuyện");
        assert_eq!(i18n.available_locales(), vec!["en".to_string(), "vi".to_string()]);
    }

    #[test]
    fn test_set_locale() {
        let i18n = I18n::builtin("vi").unwrap();
        assert!(i18n.set_locale("en"));
        assert_eq!(t!(i18n, "nav-next"), "Next");
        assert!(!i18n.set_locale("de"));
        assert_eq!(i18n.current_locale(), "en");
    }
}
