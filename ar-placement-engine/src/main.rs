// The engine only has a host inside the browser; native builds run the tests.
#[cfg(any(target_arch = "wasm32", test))]
mod engine;
#[cfg(any(target_arch = "wasm32", test))]
mod error;
#[cfg(any(target_arch = "wasm32", test))]
mod tools;
#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(any(target_arch = "wasm32", test))]
mod xr;

#[cfg(target_arch = "wasm32")]
fn main() {
    if let Err(err) = web::start() {
        web_sys::console::error_1(&format!("AR viewer failed to start: {err}").into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("ar-placement-engine runs in a browser; build it for wasm32-unknown-unknown.");
}
