//! Random credentials for throwaway test accounts.

use rand::Rng;
use rand::seq::SliceRandom;

/// Domain appended to every generated username.
pub const EMAIL_DOMAIN: &str = "bbbtest.com";

const EMAIL_LOCAL_PART_LEN: usize = 40;
const PASSWORD_CHARS_PER_CLASS: usize = 5;
const PASSWORD_PUNCTUATION: &str = "!@£$%^&*(){}[]:;'|<,>.?/+=";

fn alphanumerics() -> Vec<char> {
    ('A'..='Z').chain('a'..='z').chain('0'..='9').collect()
}

/// Generate an email-like username: 40 distinct alphanumerics at
/// [`EMAIL_DOMAIN`].
///
/// # Examples
///
/// ```
/// use shelfcheck::auth::random_email;
///
/// let email = random_email(&mut rand::thread_rng());
/// assert!(email.ends_with("@bbbtest.com"));
/// ```
pub fn random_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let pool = alphanumerics();
    let mut email: String = pool
        .choose_multiple(rng, EMAIL_LOCAL_PART_LEN)
        .copied()
        .collect();
    email.push('@');
    email.push_str(EMAIL_DOMAIN);
    email
}

/// Generate a 20 character password holding five distinct characters from
/// each of upper case, lower case, digits and punctuation, in random order.
pub fn random_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    let classes: [Vec<char>; 4] = [
        ('A'..='Z').collect(),
        ('a'..='z').collect(),
        ('0'..='9').collect(),
        PASSWORD_PUNCTUATION.chars().collect(),
    ];
    let mut picked: Vec<char> = classes
        .iter()
        .flat_map(|class| {
            class
                .choose_multiple(&mut *rng, PASSWORD_CHARS_PER_CLASS)
                .copied()
                .collect::<Vec<_>>()
        })
        .collect();
    picked.shuffle(rng);
    picked.into_iter().collect()
}
