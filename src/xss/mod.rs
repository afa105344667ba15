// Reflected parameter detection
// Stage 1: find query values echoed verbatim; stage 2: probe them with " ' < >

pub mod probe;
pub mod reflect;
