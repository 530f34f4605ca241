use super::{
    CodePatcher, JUMP_STUB_LEN, SymbolResolver, install, is_hooked, jump_stub, original_addr,
    restore,
};
use crate::errno::Errno;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::c_void;
use std::ptr;

const FAKE_BASE: usize = 0x7f00_0000_0000;

struct FakeResolver {
    symbols: BTreeMap<String, usize>,
}

impl FakeResolver {
    fn new(entries: &[(&str, usize)]) -> Self {
        let symbols = entries
            .iter()
            .map(|(name, addr)| (name.to_string(), *addr))
            .collect();
        Self { symbols }
    }
}

impl SymbolResolver for FakeResolver {
    fn resolve(&self, _handle: *mut c_void, sym_name: &str) -> Option<usize> {
        self.symbols.get(sym_name).copied()
    }
}

struct FakePatcher {
    image: RefCell<Vec<u8>>,
}

impl FakePatcher {
    fn new(size: usize) -> Self {
        Self {
            image: RefCell::new(vec![0xcc; size]),
        }
    }

    fn bytes_at(&self, addr: usize, len: usize) -> Vec<u8> {
        let offset = addr - FAKE_BASE;
        self.image.borrow()[offset..offset + len].to_vec()
    }
}

impl CodePatcher for FakePatcher {
    fn read_code(&self, addr: usize, buf: &mut [u8]) -> Result<(), Errno> {
        let offset = addr.checked_sub(FAKE_BASE).ok_or(Errno::InvalidArg)?;
        let image = self.image.borrow();
        if offset + buf.len() > image.len() {
            return Err(Errno::InvalidArg);
        }
        buf.copy_from_slice(&image[offset..offset + buf.len()]);
        Ok(())
    }

    fn write_code(&self, addr: usize, bytes: &[u8]) -> Result<(), Errno> {
        let offset = addr.checked_sub(FAKE_BASE).ok_or(Errno::InvalidArg)?;
        let mut image = self.image.borrow_mut();
        if offset + bytes.len() > image.len() {
            return Err(Errno::PatchWrite);
        }
        image[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

#[test]
fn jump_stub_embeds_target_address() {
    let target = 0x1122_3344_5566_7788usize;
    let stub = jump_stub(target);
    assert_eq!(stub.len(), JUMP_STUB_LEN);

    #[cfg(target_arch = "x86_64")]
    {
        assert_eq!(&stub[0..2], &[0x48, 0xb8]);
        assert_eq!(&stub[2..10], &(target as u64).to_le_bytes());
        assert_eq!(&stub[10..12], &[0xff, 0xe0]);
    }

    #[cfg(target_arch = "aarch64")]
    {
        assert_eq!(&stub[0..4], &0x5800_0051u32.to_le_bytes());
        assert_eq!(&stub[4..8], &0xd61f_0220u32.to_le_bytes());
        assert_eq!(&stub[8..16], &(target as u64).to_le_bytes());
    }
}

#[test]
fn install_writes_stub_and_registers_record() {
    let target = FAKE_BASE + 0x40;
    let replacement = 0xdead_beefusize;
    let resolver = FakeResolver::new(&[("_ZN4Demo4openEPKc", target)]);
    let patcher = FakePatcher::new(0x100);

    let original = install(
        &resolver,
        &patcher,
        ptr::null_mut(),
        "_ZN4Demo4openEPKc",
        replacement,
    )
    .expect("install should succeed");

    assert_eq!(original, target);
    assert!(is_hooked("_ZN4Demo4openEPKc"));
    assert_eq!(original_addr("_ZN4Demo4openEPKc"), Some(target));
    assert_eq!(
        patcher.bytes_at(target, JUMP_STUB_LEN),
        jump_stub(replacement)
    );

    assert_eq!(restore(&patcher, "_ZN4Demo4openEPKc"), Errno::Ok);
}

#[test]
fn unresolved_symbol_is_reported_not_fatal() {
    let resolver = FakeResolver::new(&[]);
    let patcher = FakePatcher::new(0x100);

    let result = install(&resolver, &patcher, ptr::null_mut(), "_ZN4Demo7missingEv", 0x1000);
    assert!(matches!(result, Err(Errno::NoSym)));
    assert!(!is_hooked("_ZN4Demo7missingEv"));
}

#[test]
fn repeated_install_is_rejected() {
    let target = FAKE_BASE + 0x20;
    let resolver = FakeResolver::new(&[("_ZN4Demo6repeatEv", target)]);
    let patcher = FakePatcher::new(0x100);

    install(&resolver, &patcher, ptr::null_mut(), "_ZN4Demo6repeatEv", 0x1000)
        .expect("first install should succeed");
    let second = install(&resolver, &patcher, ptr::null_mut(), "_ZN4Demo6repeatEv", 0x2000);
    assert!(matches!(second, Err(Errno::Repeat)));

    assert_eq!(
        patcher.bytes_at(target, JUMP_STUB_LEN),
        jump_stub(0x1000),
        "second install must not overwrite the first stub"
    );
    assert_eq!(restore(&patcher, "_ZN4Demo6repeatEv"), Errno::Ok);
}

#[test]
fn restore_writes_back_original_bytes() {
    let target = FAKE_BASE + 0x60;
    let resolver = FakeResolver::new(&[("_ZN4Demo5closeEv", target)]);
    let patcher = FakePatcher::new(0x100);
    let pristine = patcher.bytes_at(target, JUMP_STUB_LEN);

    install(&resolver, &patcher, ptr::null_mut(), "_ZN4Demo5closeEv", 0x3000)
        .expect("install should succeed");
    assert_ne!(patcher.bytes_at(target, JUMP_STUB_LEN), pristine);

    assert_eq!(restore(&patcher, "_ZN4Demo5closeEv"), Errno::Ok);
    assert_eq!(patcher.bytes_at(target, JUMP_STUB_LEN), pristine);
    assert!(!is_hooked("_ZN4Demo5closeEv"));
}

#[test]
fn restore_unknown_symbol_reports_not_found() {
    let patcher = FakePatcher::new(0x100);
    assert_eq!(restore(&patcher, "_ZN4Demo5neverEv"), Errno::NotFound);
}

#[test]
fn invalid_install_arguments_rejected() {
    let resolver = FakeResolver::new(&[]);
    let patcher = FakePatcher::new(0x100);

    assert!(matches!(
        install(&resolver, &patcher, ptr::null_mut(), "", 0x1000),
        Err(Errno::InvalidArg)
    ));
    assert!(matches!(
        install(&resolver, &patcher, ptr::null_mut(), "_ZN4Demo4nullEv", 0),
        Err(Errno::InvalidArg)
    ));
}
