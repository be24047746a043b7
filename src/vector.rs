use crate::ErrorKind;

/// Output buffer abstraction used by the PDU and ADU encoders
///
/// Implemented for `std` vectors, for [`fixedvec::FixedVec`] (a view over a caller-owned slice,
/// e.g. the transport buffer) and for [`heapless::Vec`].
pub trait VectorTrait<T: Copy> {
    fn push(&mut self, value: T) -> Result<(), ErrorKind>;
    fn extend(&mut self, other: &[T]) -> Result<(), ErrorKind>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn clear(&mut self);
    fn as_slice(&self) -> &[T];
}

#[cfg(any(feature = "std", test))]
impl<T: Copy> VectorTrait<T> for std::vec::Vec<T> {
    #[inline]
    fn push(&mut self, value: T) -> Result<(), ErrorKind> {
        std::vec::Vec::push(self, value);
        Ok(())
    }
    #[inline]
    fn extend(&mut self, values: &[T]) -> Result<(), ErrorKind> {
        std::vec::Vec::extend_from_slice(self, values);
        Ok(())
    }
    #[inline]
    fn len(&self) -> usize {
        std::vec::Vec::len(self)
    }
    #[inline]
    fn is_empty(&self) -> bool {
        std::vec::Vec::is_empty(self)
    }
    #[inline]
    fn clear(&mut self) {
        std::vec::Vec::clear(self);
    }
    #[inline]
    fn as_slice(&self) -> &[T] {
        std::vec::Vec::as_slice(self)
    }
}

use fixedvec::FixedVec;

impl<T: Copy> VectorTrait<T> for FixedVec<'_, T> {
    #[inline]
    fn push(&mut self, value: T) -> Result<(), ErrorKind> {
        FixedVec::push(self, value).map_err(|_| ErrorKind::OOB)
    }
    #[inline]
    fn extend(&mut self, values: &[T]) -> Result<(), ErrorKind> {
        FixedVec::push_all(self, values).map_err(|_| ErrorKind::OOB)
    }
    #[inline]
    fn len(&self) -> usize {
        FixedVec::len(self)
    }
    #[inline]
    fn is_empty(&self) -> bool {
        FixedVec::is_empty(self)
    }
    #[inline]
    fn clear(&mut self) {
        FixedVec::clear(self);
    }
    #[inline]
    fn as_slice(&self) -> &[T] {
        FixedVec::as_slice(self)
    }
}

use heapless::Vec as HeaplessVec;

impl<T: Copy, const N: usize> VectorTrait<T> for HeaplessVec<T, N> {
    #[inline]
    fn push(&mut self, value: T) -> Result<(), ErrorKind> {
        HeaplessVec::push(self, value).map_err(|_| ErrorKind::OOB)
    }
    #[inline]
    fn extend(&mut self, values: &[T]) -> Result<(), ErrorKind> {
        self.extend_from_slice(values).map_err(|_| ErrorKind::OOB)
    }
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
    #[inline]
    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
    #[inline]
    fn clear(&mut self) {
        HeaplessVec::clear(self);
    }
    #[inline]
    fn as_slice(&self) -> &[T] {
        HeaplessVec::as_slice(self)
    }
}
