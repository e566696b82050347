#![no_main]
use eqshot_extract::{
    equation_label, extract_candidates, extract_equations, extract_preamble, unnumber,
    EquationSelection,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Recognizers slice by byte offsets; any input must stay panic-free.
    let s = String::from_utf8_lossy(data);
    for candidate in extract_candidates(&s, EquationSelection::all()) {
        assert!(candidate.text.len() >= candidate.content.len());
        let _ = (candidate.opening(), candidate.closing());
    }
    for eq in extract_equations(&s, EquationSelection::all()) {
        let _ = equation_label(&unnumber(&eq));
    }
    let _ = extract_preamble(&s);
});
