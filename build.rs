use vergen::{BuildBuilder, Emitter};

// Only the build timestamp is logged at startup.
fn main() {
    if let Ok(build) = BuildBuilder::default().build_timestamp(true).build() {
        if let Ok(emitter) = Emitter::default().add_instructions(&build) {
            let _ = emitter.emit();
        }
    }
}
