#![no_main]
use libfuzzer_sys::fuzz_target;
use texfit_core::{BoxSize, FitEngine, FitRequest, Viewport};
use texfit_layout::format::{balance_delimiters, normalize_spacing};
use texfit_layout::{LayoutOptions, generate, split};
use texfit_syntax::scan;

fuzz_target!(|data: &[u8]| {
    // Scanning, splitting and fitting must never panic on malformed input.
    let s = String::from_utf8_lossy(data);
    let _ = scan(&s);
    let _ = split(&s);
    let _ = normalize_spacing(&s);
    let _ = generate(&balance_delimiters(&s), &LayoutOptions::default());

    let engine = FitEngine::new();
    let _ = engine.fit(&FitRequest {
        expression: s.into_owned(),
        container: BoxSize::new(240.0, 120.0),
        viewport: Viewport::new(390.0, 844.0),
    });
});
