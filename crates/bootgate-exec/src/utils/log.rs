//! Logging for `pre_exec` hooks.
//!
//! Between `fork()` and `execve()` only async-signal-safe calls are allowed,
//! so no `tracing`, no allocation: raw `write(2)` to stderr from stack buffers.

/// Write `msg`, followed by ` errno=<n>` when given, and a newline.
#[cfg(unix)]
pub fn pre_exec_log(msg: &[u8], errno: Option<i32>) {
    write_stderr(msg);

    if let Some(errno) = errno {
        let mut buf = [0u8; 16];
        let mut idx = buf.len();
        let mut n = errno.unsigned_abs();
        loop {
            idx -= 1;
            buf[idx] = b'0' + (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        if errno < 0 {
            idx -= 1;
            buf[idx] = b'-';
        }
        write_stderr(b" errno=");
        write_stderr(&buf[idx..]);
    }
    write_stderr(b"\n");
}

#[cfg(unix)]
fn write_stderr(bytes: &[u8]) {
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            bytes.as_ptr() as *const libc::c_void,
            bytes.len(),
        );
    }
}
