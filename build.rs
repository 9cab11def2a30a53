use std::error::Error;

// Emits VERGEN_GIT_SHA and VERGEN_BUILD_TIMESTAMP for `slmbuild info`.
fn main() -> Result<(), Box<dyn Error>> {
    let build = vergen_gitcl::BuildBuilder::default()
        .build_timestamp(true)
        .build()?;
    let git = vergen_gitcl::GitclBuilder::default().sha(true).build()?;

    vergen_gitcl::Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&git)?
        .emit()?;
    Ok(())
}
