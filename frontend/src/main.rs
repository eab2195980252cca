mod app;
mod mapbox;
mod pages;
mod session;
mod types;

fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}
