//! Browser entry point (built with `trunk` and the `csr` feature).

fn main() {
    #[cfg(feature = "csr")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);
        log::info!("amal-admin starting");
        leptos::mount::mount_to_body(amal_admin::app::App);
    }
}
