//! End-of-test verification across mocks.

use crate::error::{MockError, MockResult};
use crate::mocks::mock::Mock;

/// Something that can check, after a test, that it was used as expected.
pub trait Verifiable {
    fn verify(&self) -> MockResult<()>;
}

impl Verifiable for Mock {
    fn verify(&self) -> MockResult<()> {
        Mock::verify(self)
    }
}

/// Verify every object, collecting all failures instead of stopping at the
/// first.
pub fn verify_all(objects: &[&dyn Verifiable]) -> Result<(), Vec<MockError>> {
    let failures: Vec<MockError> = objects
        .iter()
        .filter_map(|object| object.verify().err())
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}
