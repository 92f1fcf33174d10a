//! Encapsulates Windows API calls.
//!
//! On other targets every check passes so the installer can be exercised anywhere.

#[cfg(windows)]
mod imp {
    use std::mem;
    use std::ptr;
    use winapi::shared::minwindef::{DWORD, LPVOID};
    use winapi::shared::winerror;
    use winapi::um::{errhandlingapi, handleapi, processthreadsapi, securitybaseapi, synchapi, winnt};

    const MUTEX_NAME: &[u8] = b"DriverInstallerAppMutex\0";

    /// Holds the named mutex for the lifetime of the process.
    pub struct InstanceGuard {
        handle: winnt::HANDLE,
    }

    impl Drop for InstanceGuard {
        fn drop(&mut self) {
            unsafe {
                handleapi::CloseHandle(self.handle);
            }
        }
    }

    /// Takes the named mutex. `None` when another installer already holds it.
    pub fn acquire_single_instance() -> Option<InstanceGuard> {
        unsafe {
            let handle = synchapi::CreateMutexA(ptr::null_mut(), 0, MUTEX_NAME.as_ptr() as *const i8);
            if handle.is_null() {
                return None;
            }
            if errhandlingapi::GetLastError() == winerror::ERROR_ALREADY_EXISTS {
                handleapi::CloseHandle(handle);
                return None;
            }
            Some(InstanceGuard { handle })
        }
    }

    /// Whether the process token is elevated.
    pub fn is_elevated() -> bool {
        unsafe {
            let mut token: winnt::HANDLE = ptr::null_mut();
            if processthreadsapi::OpenProcessToken(
                processthreadsapi::GetCurrentProcess(),
                winnt::TOKEN_QUERY,
                &mut token,
            ) == 0
            {
                log::debug!("OpenProcessToken failed: {}", errhandlingapi::GetLastError());
                return false;
            }

            let mut elevation = winnt::TOKEN_ELEVATION { TokenIsElevated: 0 };
            let mut returned: DWORD = 0;
            let ok = securitybaseapi::GetTokenInformation(
                token,
                winnt::TokenElevation,
                &mut elevation as *mut _ as LPVOID,
                mem::size_of::<winnt::TOKEN_ELEVATION>() as DWORD,
                &mut returned,
            );
            handleapi::CloseHandle(token);
            ok != 0 && elevation.TokenIsElevated != 0
        }
    }
}

#[cfg(not(windows))]
mod imp {
    pub struct InstanceGuard;

    pub fn acquire_single_instance() -> Option<InstanceGuard> {
        Some(InstanceGuard)
    }

    pub fn is_elevated() -> bool {
        true
    }
}

pub use imp::{acquire_single_instance, is_elevated, InstanceGuard};
