//! `select(2)` over [`Socket`] sets.
//!
//! Each set is narrowed in place to the sockets that are ready, mirroring the
//! way `select(2)` rewrites its `fd_set` arguments.

use std::io;
use std::mem::MaybeUninit;
use std::os::fd::RawFd;
use std::ptr;
use std::time::Duration;

use crate::error::SocketError;
use crate::socket::Socket;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

struct FdSet(libc::fd_set);

impl FdSet {
    fn new() -> Self {
        let mut set = MaybeUninit::<libc::fd_set>::uninit();
        // SAFETY: FD_ZERO fully initialises the set.
        unsafe {
            libc::FD_ZERO(set.as_mut_ptr());
            FdSet(set.assume_init())
        }
    }

    fn insert(&mut self, fd: RawFd) {
        // SAFETY: callers check `fd < FD_SETSIZE`.
        unsafe { libc::FD_SET(fd, &mut self.0) }
    }

    fn contains(&self, fd: RawFd) -> bool {
        // SAFETY: as in `insert`.
        unsafe { libc::FD_ISSET(fd, &self.0) }
    }

    fn as_mut_ptr(set: &mut Option<FdSet>) -> *mut libc::fd_set {
        set.as_mut().map_or(ptr::null_mut(), |set| &mut set.0 as *mut libc::fd_set)
    }
}

/// Waits until any socket is readable, writable or has an exceptional condition.
///
/// `None` sets are not watched, a `None` timeout blocks indefinitely. Returns
/// the number of ready descriptors, `0` on timeout.
pub fn select<'a>(
    read: Option<&mut Vec<&'a Socket>>,
    write: Option<&mut Vec<&'a Socket>>,
    except: Option<&mut Vec<&'a Socket>>,
    timeout: Option<Duration>,
) -> Result<usize, SocketError> {
    let mut max_fd: RawFd = -1;
    let mut read_set: Option<FdSet> = prepare(read.as_deref(), &mut max_fd)?;
    let mut write_set: Option<FdSet> = prepare(write.as_deref(), &mut max_fd)?;
    let mut except_set: Option<FdSet> = prepare(except.as_deref(), &mut max_fd)?;

    let mut tv: Option<libc::timeval> = timeout.map(|timeout| libc::timeval {
        tv_sec: timeout.as_secs() as libc::time_t,
        tv_usec: timeout.subsec_micros() as libc::suseconds_t,
    });
    let tv_ptr: *mut libc::timeval = tv.as_mut().map_or(ptr::null_mut(), |tv| tv as *mut libc::timeval);

    // SAFETY: every set pointer is either null or a live, initialised fd_set,
    // and every descriptor in them is below FD_SETSIZE.
    let ready = unsafe {
        libc::select(
            max_fd + 1,
            FdSet::as_mut_ptr(&mut read_set),
            FdSet::as_mut_ptr(&mut write_set),
            FdSet::as_mut_ptr(&mut except_set),
            tv_ptr,
        )
    };
    if ready == -1 {
        return Err(io::Error::last_os_error().into());
    }

    retain_ready(read, &read_set);
    retain_ready(write, &write_set);
    retain_ready(except, &except_set);

    Ok(ready as usize)
}

fn prepare(sockets: Option<&Vec<&Socket>>, max_fd: &mut RawFd) -> Result<Option<FdSet>, SocketError> {
    let Some(sockets) = sockets else {
        return Ok(None);
    };

    let mut set = FdSet::new();
    for socket in sockets {
        let fd: RawFd = socket.raw_fd()?;
        if fd as usize >= libc::FD_SETSIZE as usize {
            return Err(SocketError::from_code(libc::EINVAL));
        }
        set.insert(fd);
        *max_fd = (*max_fd).max(fd);
    }
    Ok(Some(set))
}

fn retain_ready(sockets: Option<&mut Vec<&Socket>>, set: &Option<FdSet>) {
    if let (Some(sockets), Some(set)) = (sockets, set) {
        sockets.retain(|socket| socket.raw_fd().is_ok_and(|fd| set.contains(fd)));
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
