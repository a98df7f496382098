use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(ce) => ce.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Text of the duplicate-key message, used to tell which unique index fired.
///
/// The server reports e.g. `E11000 duplicate key error collection: taskhub.users index: email_1 dup key: ...`.
pub fn duplicate_key_index(err: &Error) -> Option<&str> {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE => {
            we.message.as_str()
        }
        ErrorKind::Command(ce) if ce.code == DUPLICATE_KEY_CODE => ce.message.as_str(),
        _ => return None,
    };

    let after = message.split("index: ").nth(1)?;
    after.split_whitespace().next()
}
