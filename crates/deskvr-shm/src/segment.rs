use std::sync::atomic::AtomicU8;

/// Backing storage of a channel, viewed as a slice of atomic bytes.
///
/// Both variants share the same wire layout; only the owner of the memory differs.
pub(crate) enum Segment {
    #[cfg(unix)]
    Posix(posix::PosixSegment),
    Heap(Box<[AtomicU8]>),
}

impl Segment {
    pub(crate) fn heap(len: usize) -> Self {
        Segment::Heap((0..len).map(|_| AtomicU8::new(0)).collect())
    }

    pub(crate) fn bytes(&self) -> &[AtomicU8] {
        match self {
            #[cfg(unix)]
            Segment::Posix(segment) => segment.bytes(),
            Segment::Heap(bytes) => bytes,
        }
    }
}

#[cfg(unix)]
pub(crate) mod posix {
    use std::ffi::CString;
    use std::io;
    use std::ptr::{self, NonNull};
    use std::sync::atomic::AtomicU8;

    /// A `MAP_SHARED` mapping of a named POSIX shared-memory object.
    pub(crate) struct PosixSegment {
        ptr: NonNull<u8>,
        len: usize,
    }

    // SAFETY: the mapping is only ever accessed through `AtomicU8` views.
    unsafe impl Send for PosixSegment {}
    unsafe impl Sync for PosixSegment {}

    impl PosixSegment {
        /// Open (creating if needed) the object `name` and map at least `capacity` bytes.
        pub(crate) fn open(name: &str, capacity: usize) -> io::Result<Self> {
            let path = object_path(name)?;

            let fd = unsafe {
                libc::shm_open(
                    path.as_ptr(),
                    libc::O_CREAT | libc::O_RDWR,
                    0o600 as libc::mode_t,
                )
            };
            if fd < 0 {
                return Err(io::Error::last_os_error());
            }

            let mapped = map_fd(fd, capacity);
            // The mapping keeps the object alive once established.
            unsafe { libc::close(fd) };
            mapped
        }

        pub(crate) fn bytes(&self) -> &[AtomicU8] {
            // SAFETY: ptr/len describe a live mapping owned by self; AtomicU8 has the
            // same layout as u8.
            unsafe { std::slice::from_raw_parts(self.ptr.as_ptr() as *const AtomicU8, self.len) }
        }
    }

    impl Drop for PosixSegment {
        fn drop(&mut self) {
            unsafe {
                libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len);
            }
        }
    }

    fn map_fd(fd: libc::c_int, capacity: usize) -> io::Result<PosixSegment> {
        let mut stat: libc::stat = unsafe { std::mem::zeroed() };
        if unsafe { libc::fstat(fd, &mut stat) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let existing = usize::try_from(stat.st_size).unwrap_or(0);
        let len = if existing < capacity {
            let size = libc::off_t::try_from(capacity)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            if unsafe { libc::ftruncate(fd, size) } != 0 {
                return Err(io::Error::last_os_error());
            }
            capacity
        } else {
            existing
        };

        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        let ptr = NonNull::new(addr as *mut u8)
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "mmap returned null"))?;
        Ok(PosixSegment { ptr, len })
    }

    pub(crate) fn unlink(name: &str) -> io::Result<()> {
        let path = object_path(name)?;
        if unsafe { libc::shm_unlink(path.as_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// POSIX object names are a single leading slash followed by a slash-free name.
    fn object_path(name: &str) -> io::Result<CString> {
        if name.is_empty() || name.contains('/') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid shared memory name {name:?}"),
            ));
        }
        CString::new(format!("/{name}")).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}
