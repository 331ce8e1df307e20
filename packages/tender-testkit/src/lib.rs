mod error;

pub use error::{Error, Result};

use std::{env, fs, future::Future, path::PathBuf};

use uuid::Uuid;

/// A uniquely named SQLite database file under the system temp directory.
/// The file itself is created lazily by the first connection; this type owns
/// the path and removes the database and its WAL sidecars on cleanup.
pub struct TestDatabase {
	name: String,
	path: PathBuf,
	cleaned: bool,
}
impl TestDatabase {
	pub fn new() -> Result<Self> {
		let name = format!("tender_test_{}", Uuid::new_v4().simple());
		let path = env::temp_dir().join(format!("{name}.db"));

		if path.exists() {
			return Err(Error::Message(format!(
				"Test database path already exists: {}.",
				path.display()
			)));
		}

		Ok(Self { name, path, cleaned: false })
	}

	pub fn dsn(&self) -> String {
		self.path.display().to_string()
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		remove_database_files(&self.path)?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		if let Err(err) = remove_database_files(&self.path) {
			eprintln!("Test database cleanup failed: {err}.");
		}
	}
}

pub async fn with_test_db<F, Fut, T>(f: F) -> Result<T>
where
	F: FnOnce(&TestDatabase) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let db = TestDatabase::new()?;
	let result = f(&db).await;
	let mut db = db;

	if let Err(err) = db.cleanup_inner() {
		eprintln!("Test database cleanup warning: {err}.");

		if result.is_ok() {
			return Err(err);
		}
	}

	result
}

fn remove_database_files(path: &PathBuf) -> Result<()> {
	// WAL mode leaves `-wal` and `-shm` siblings next to the database file.
	let mut sidecars = vec![path.clone()];

	if let Some(base) = path.to_str() {
		sidecars.push(PathBuf::from(format!("{base}-wal")));
		sidecars.push(PathBuf::from(format!("{base}-shm")));
	}

	for file in sidecars {
		match fs::remove_file(&file) {
			Ok(()) => {},
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
			Err(err) => return Err(Error::Io(err)),
		}
	}

	Ok(())
}
