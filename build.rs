use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let gitcl = GitclBuilder::default().sha(true).build()?;
	let cargo = CargoBuilder::default().target_triple(true).build()?;

	// Outside a git checkout the emitter falls back to idempotent defaults
	// instead of failing the build.
	Emitter::default().add_instructions(&gitcl)?.add_instructions(&cargo)?.emit()?;

	Ok(())
}
