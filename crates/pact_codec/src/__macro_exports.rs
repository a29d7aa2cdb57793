//! Items used by code generated from `pact_codec_derive`.

pub use alloc::boxed::Box;

pub use crate::object::cast_boxed;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{CodecRegistry, CompactFields};

    /// A registration function collected at link time.
    pub struct __AutoRegisterFunc(pub fn(&mut CodecRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut CodecRegistry);
    }

    impl<T: CompactFields> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut CodecRegistry) {
            registry.register::<T>();
        }
    }

    // Runs with the others; its effect shows whether collection works here.
    fn mark_available(registry: &mut CodecRegistry) {
        registry.mark_auto_registered();
    }

    inventory::submit! {
        __AutoRegisterFunc(mark_available)
    }

    pub(crate) fn __register_types(registry: &mut CodecRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
