use rand::Rng;

/// Email and display name for a fresh guest account, derived from a random
/// number in 0..10000. Uniqueness against existing accounts is the caller's
/// job; it retries with a new draw while the email is taken.
pub fn guest_identity() -> (String, String) {
    let number = rand::thread_rng().gen_range(0..10_000);
    (
        format!("guest{number}@example.com"),
        format!("Guest User {number}"),
    )
}
