//! Shared-storage parameter tensors

use ndarray::Array1;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

/// A learnable parameter: flat `f32` storage plus an accumulated gradient.
///
/// Cloning is cheap and shares storage, so handles held by the trainer and
/// optimizer observe updates made through the model's own handles. No
/// computation graph lives here; producing gradients is the model's job,
/// and `Tensor` only carries them between `backward` and the optimizer
/// step.
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Rc<RefCell<Array1<f32>>>,
    grad: Rc<RefCell<Option<Array1<f32>>>>,
    requires_grad: bool,
}

impl Tensor {
    /// Create a tensor from a flat vector of values
    pub fn from_vec(data: Vec<f32>, requires_grad: bool) -> Self {
        Self {
            data: Rc::new(RefCell::new(Array1::from_vec(data))),
            grad: Rc::new(RefCell::new(None)),
            requires_grad,
        }
    }

    /// Create a zero-filled tensor
    pub fn zeros(len: usize, requires_grad: bool) -> Self {
        Self::from_vec(vec![0.0; len], requires_grad)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Check if the tensor has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the current values
    pub fn data(&self) -> Array1<f32> {
        self.data.borrow().clone()
    }

    /// Mutable view of the underlying storage
    pub fn data_mut(&self) -> RefMut<'_, Array1<f32>> {
        self.data.borrow_mut()
    }

    /// Copy of the accumulated gradient, if any
    pub fn grad(&self) -> Option<Array1<f32>> {
        self.grad.borrow().clone()
    }

    /// Replace the accumulated gradient
    pub fn set_grad(&self, grad: Array1<f32>) {
        *self.grad.borrow_mut() = Some(grad);
    }

    /// Add into the accumulated gradient, starting from zero when unset
    pub fn accumulate_grad(&self, delta: &Array1<f32>) {
        let mut slot = self.grad.borrow_mut();
        match slot.as_mut() {
            Some(grad) => *grad += delta,
            None => *slot = Some(delta.clone()),
        }
    }

    /// Clear the accumulated gradient
    pub fn zero_grad(&self) {
        *self.grad.borrow_mut() = None;
    }

    /// Whether the optimizer should update this tensor
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Owned copy of the values as a plain vector
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.borrow().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_from_vec() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        assert_eq!(t.len(), 3);
        assert!(t.requires_grad());
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(4, false);
        assert_eq!(t.to_vec(), vec![0.0; 4]);
        assert!(!t.requires_grad());
        assert!(!t.is_empty());
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = Tensor::from_vec(vec![1.0, 1.0], true);
        let b = a.clone();
        b.data_mut()[0] = 5.0;
        assert_eq!(a.to_vec(), vec![5.0, 1.0]);
    }

    #[test]
    fn test_clone_shares_gradient() {
        let a = Tensor::from_vec(vec![0.0], true);
        let b = a.clone();
        b.set_grad(arr1(&[2.5]));
        assert_eq!(a.grad().unwrap()[0], 2.5);
    }

    #[test]
    fn test_grad_starts_empty() {
        let t = Tensor::zeros(2, true);
        assert!(t.grad().is_none());
    }

    #[test]
    fn test_accumulate_grad() {
        let t = Tensor::zeros(2, true);
        t.accumulate_grad(&arr1(&[1.0, 2.0]));
        t.accumulate_grad(&arr1(&[0.5, 0.5]));
        let grad = t.grad().unwrap();
        assert_eq!(grad, arr1(&[1.5, 2.5]));
    }

    #[test]
    fn test_zero_grad_clears() {
        let t = Tensor::zeros(2, true);
        t.set_grad(arr1(&[1.0, 1.0]));
        t.zero_grad();
        assert!(t.grad().is_none());
    }
}
