use lccc_siphash::siphash::sys::SipHashState;

/// A SipHash-driven generator, used to key [`RandomState`][crate::hash::RandomState].
#[derive(Clone, Debug)]
pub struct Rand(SipHashState);

impl Rand {
    /// Seeds a new generator from the operating system's random source.
    pub fn init() -> Self {
        let [k0, k1] = os_seed();

        Self::from_seed(k0, k1)
    }

    /// Builds a generator from a fixed seed. The same seed always produces the same sequence.
    pub fn from_seed(k0: u64, k1: u64) -> Self {
        Self(SipHashState::from_keys(k0, k1))
    }

    pub fn gen(&mut self) -> u64 {
        self.0.update_before_rounds(0x123456789ABCDEF);
        self.0.round();
        self.0.round();
        self.0.update_after_rounds(0x123456789ABCDEF);
        let mut state = self.0;
        state.update_before_final();
        state.finish()
    }
}

#[allow(unused_parens)] // Removing them changes how the macro is parsed
fn os_seed() -> [u64; 2] {
    let mut keys = [0u64; 2];

    cfg_match::cfg_match! {
        unix => ({
            let len = core::mem::size_of_val(&keys);
            let read = unsafe { libc::getrandom(keys.as_mut_ptr().cast(), len, 0) };
            assert_eq!(read, len as isize, "getrandom failed to fill the hasher seed");
        }),
        windows => ({
            use windows_sys::Win32::Security::Cryptography::{
                BCryptGenRandom, BCRYPT_USE_SYSTEM_PREFERRED_RNG,
            };

            let status = unsafe {
                BCryptGenRandom(
                    core::mem::zeroed(),
                    keys.as_mut_ptr().cast(),
                    core::mem::size_of_val(&keys) as u32,
                    BCRYPT_USE_SYSTEM_PREFERRED_RNG,
                )
            };
            assert_eq!(status, windows_sys::Win32::Foundation::STATUS_SUCCESS);
        })
        _ => compile_error!("unsupported platform due to inability to generate random number")
    }

    keys
}
