use leptos::prelude::*;
use webcam_capture_lib::app::App;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
