//! Certificate formatter.

/// Width of a PEM body line.
const LINE_WIDTH: usize = 64;

const BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const END: &str = "-----END CERTIFICATE-----";

/// Wraps a base64 certificate body in PEM armor.
///
/// The body is split into 64 character lines between the standard begin
/// and end markers, with a trailing newline. The base64 itself is not
/// checked here; a bad body fails when the certificate is parsed.
#[must_use]
pub fn to_pem(body: &str) -> String {
    let chars: Vec<char> = body.chars().filter(|c| !c.is_whitespace()).collect();

    let mut pem = String::with_capacity(chars.len() + 2 * LINE_WIDTH);
    pem.push_str(BEGIN);
    pem.push('\n');
    for line in chars.chunks(LINE_WIDTH) {
        pem.extend(line);
        pem.push('\n');
    }
    pem.push_str(END);
    pem.push('\n');
    pem
}

/// Returns configured certificate text as PEM, wrapping a bare body.
pub(crate) fn ensure_pem(certificate: &str) -> String {
    if certificate.contains(BEGIN) {
        certificate.to_owned()
    } else {
        to_pem(certificate)
    }
}
