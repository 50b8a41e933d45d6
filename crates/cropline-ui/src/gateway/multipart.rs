// crates/cropline-ui/src/gateway/multipart.rs
//
// Minimal multipart/form-data encoder for the /process upload. ureq carries
// no multipart support of its own, so the body is assembled by hand: each
// part framed by `--boundary`, a blank line between part headers and
// content, and a `--boundary--` terminator (RFC 7578 layout).

use uuid::Uuid;

pub struct MultipartBody {
    boundary: String,
    buf:      Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("cropline-{}", Uuid::new_v4().simple()),
            buf:      Vec::new(),
        }
    }

    fn open_part(&mut self) {
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    pub fn add_text(&mut self, name: &str, value: &str) {
        self.open_part();
        self.buf.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    pub fn add_file(&mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) {
        self.open_part();
        self.buf.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
    }

    /// Terminate the body. Returns the `Content-Type` header value and the
    /// finished bytes.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"--\r\n");
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.buf,
        )
    }
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_framed_and_terminated() {
        let mut body = MultipartBody::new();
        body.add_file("video", "in.mp4", "video/mp4", b"FRAMES");
        body.add_text("crop_height", "720");
        let (content_type, bytes) = body.finish();

        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .expect("content type carries the boundary");
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with(&format!("--{boundary}\r\n")));
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"video\"; filename=\"in.mp4\"\r\n"
        ));
        assert!(text.contains("Content-Type: video/mp4\r\n\r\nFRAMES\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"crop_height\"\r\n\r\n720\r\n"));
        assert!(text.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn binary_content_is_untouched() {
        let payload: Vec<u8> = (0..=255).collect();
        let mut body = MultipartBody::new();
        body.add_file("video", "raw.bin", "application/octet-stream", &payload);
        let (_, bytes) = body.finish();

        // The raw bytes appear verbatim between the header blank line and
        // the closing CRLF.
        let needle = b"\r\n\r\n";
        let start = bytes
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|i| i + needle.len())
            .unwrap();
        assert_eq!(&bytes[start..start + payload.len()], &payload[..]);
    }

    #[test]
    fn boundaries_are_unique_per_body() {
        let (a, _) = MultipartBody::new().finish();
        let (b, _) = MultipartBody::new().finish();
        assert_ne!(a, b);
    }
}
