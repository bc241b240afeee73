use cotodo_core::env::ColorScheme;

pub struct MediaColorScheme;

impl ColorScheme for MediaColorScheme {
    fn prefers_dark(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .is_some_and(|query| query.matches())
    }
}
