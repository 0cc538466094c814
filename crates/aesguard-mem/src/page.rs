//! Pages - anonymous page mapping with lock/protect primitives.
//!
//! Each syscall is exposed separately so the region above can order them and
//! react to individual failures. Dropping `Pages` unlocks and unmaps; wiping
//! the contents first is the caller's job.

use core::ptr::{self, NonNull};

use crate::error::PageError;

/// System page size in bytes.
pub(crate) fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
}

/// One or more contiguous pages obtained from `mmap`.
#[derive(Debug)]
pub(crate) struct Pages {
    ptr: NonNull<u8>,
    capacity: usize,
}

impl Pages {
    /// Maps enough zeroed pages to hold `len` bytes (at least one page).
    /// Does NOT lock or protect.
    pub(crate) fn map(len: usize) -> Result<Self, PageError> {
        let page = page_size();
        let capacity = len.max(1).div_ceil(page) * page;

        let raw = unsafe {
            libc::mmap(
                ptr::null_mut(),
                capacity,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if raw == libc::MAP_FAILED {
            return Err(PageError::Create);
        }

        let ptr = NonNull::new(raw.cast::<u8>()).ok_or(PageError::Create)?;
        Ok(Self { ptr, capacity })
    }

    /// Locks the pages in RAM.
    pub(crate) fn lock(&self) -> Result<(), PageError> {
        if unsafe { libc::mlock(self.ptr.as_ptr().cast(), self.capacity) } != 0 {
            return Err(PageError::Lock);
        }
        Ok(())
    }

    /// Asks the kernel to leave these pages out of core dumps. Best-effort.
    #[cfg(target_os = "linux")]
    pub(crate) fn exclude_from_dumps(&self) -> bool {
        unsafe { libc::madvise(self.ptr.as_ptr().cast(), self.capacity, libc::MADV_DONTDUMP) == 0 }
    }

    #[cfg(not(target_os = "linux"))]
    pub(crate) fn exclude_from_dumps(&self) -> bool {
        false
    }

    /// Sets the pages to PROT_READ.
    pub(crate) fn protect(&self) -> Result<(), PageError> {
        if !self.mprotect(libc::PROT_READ) {
            return Err(PageError::Protect);
        }
        Ok(())
    }

    /// Sets the pages back to PROT_READ | PROT_WRITE.
    pub(crate) fn unprotect(&self) -> Result<(), PageError> {
        if !self.mprotect(libc::PROT_READ | libc::PROT_WRITE) {
            return Err(PageError::Unprotect);
        }
        Ok(())
    }

    fn mprotect(&self, prot: libc::c_int) -> bool {
        unsafe { libc::mprotect(self.ptr.as_ptr().cast(), self.capacity, prot) == 0 }
    }

    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Mapped size in bytes (a whole number of pages).
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mutable view of every mapped byte.
    ///
    /// # Safety
    /// Pages must be writable, otherwise SIGSEGV.
    pub(crate) unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.capacity) }
    }
}

impl Drop for Pages {
    fn drop(&mut self) {
        unsafe {
            libc::munlock(self.ptr.as_ptr().cast(), self.capacity);
            libc::munmap(self.ptr.as_ptr().cast(), self.capacity);
        }
    }
}
