//! Random registration codes for arriving cars.

use rand::Rng;

use crate::core::occupant::{OccupantId, OCCUPANT_ID_LEN, OCCUPANT_ID_LETTERS};

/// Draw a code of three uppercase letters followed by three digits.
pub fn random_occupant_id<R: Rng + ?Sized>(rng: &mut R) -> OccupantId {
    let code: String = (0..OCCUPANT_ID_LEN)
        .map(|i| {
            if i < OCCUPANT_ID_LETTERS {
                char::from(rng.random_range(b'A'..=b'Z'))
            } else {
                char::from(rng.random_range(b'0'..=b'9'))
            }
        })
        .collect();
    OccupantId::new_unchecked(code)
}
