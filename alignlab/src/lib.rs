#[cfg(feature = "core")]
#[doc(inline)]
pub use alignlab_core as core;

#[cfg(feature = "tokenizers")]
#[doc(inline)]
pub use alignlab_tokenizers as tokenizers;

#[cfg(feature = "labeling")]
#[doc(inline)]
pub use alignlab_labeling as labeling;

#[cfg(feature = "refs")]
#[doc(inline)]
pub use alignlab_refs as refs;
