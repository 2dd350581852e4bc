/// Hierarchical transform stack with pending-transform accumulation
///
/// Callers stage a rotation, scale and translation with the `set_*` methods,
/// then commit them into the top matrix with `apply_transform`. `push` and
/// `pop` save and restore the committed matrix around a sub-tree of the scene.
///
/// Committing composes `top · Translate · Rotate · Scale`, so a point is scaled,
/// then rotated (Z, Y, X), then translated in the node's local space before the
/// parent's matrix applies.
use log::{debug, trace, warn};
use nalgebra::Vector3;

use crate::error::{Result, TransformError};
use crate::transform::{Matrix, Transform};

const INITIAL_CAPACITY: usize = 16;

/// Stack sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    /// Maximum number of matrices, base included. Clamped to at least 1.
    pub max_depth: usize,
}

impl StackConfig {
    /// No depth limit; `push` only fails on a bounded config
    pub const UNBOUNDED: Self = Self {
        max_depth: usize::MAX,
    };

    pub fn bounded(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Rotation, scale and translation staged but not yet committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTransform {
    /// Euler angles in radians
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl PendingTransform {
    /// True when committing would leave the top matrix unchanged
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// The local matrix `Translate · Rotate · Scale`
    pub fn matrix(&self) -> Matrix {
        let t = &self.translation;
        let s = &self.scale;
        let translate = Transform::translation_matrix(t.x, t.y, t.z);
        let rotate = Transform::rotation_matrix(&self.rotation);
        let scale = Transform::scale_matrix(s.x, s.y, s.z);

        translate * rotate * scale
    }
}

impl Default for PendingTransform {
    fn default() -> Self {
        Self {
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            translation: Vector3::zeros(),
        }
    }
}

/// A LIFO of committed matrices that always holds at least the base matrix
#[derive(Debug, Clone)]
pub struct TransformStack {
    matrices: Vec<Matrix>,
    pending: PendingTransform,
    max_depth: usize,
}

impl TransformStack {
    /// Create an unbounded stack holding a single identity matrix
    pub fn new() -> Self {
        Self::with_config(StackConfig::default())
    }

    pub fn with_config(config: StackConfig) -> Self {
        let max_depth = config.max_depth.max(1);
        let mut matrices = Vec::with_capacity(max_depth.min(INITIAL_CAPACITY));
        matrices.push(Transform::identity());

        Self {
            matrices,
            pending: PendingTransform::default(),
            max_depth,
        }
    }

    /// Duplicate the top matrix so a child can modify it without touching
    /// the parent's copy.
    ///
    /// Fails only when a bounded `StackConfig` is full.
    pub fn push(&mut self) -> Result<()> {
        if self.matrices.len() >= self.max_depth {
            warn!("push rejected: stack full (max {} entries)", self.max_depth);
            return Err(TransformError::StackOverflow {
                max_depth: self.max_depth,
            });
        }

        let copy = self.copy_top();
        self.matrices.push(copy);
        self.pending = PendingTransform::default();
        debug!("pushed transform, depth {}", self.matrices.len());
        Ok(())
    }

    /// Discard the top matrix, exposing the parent's.
    ///
    /// The base matrix can never be popped.
    pub fn pop(&mut self) -> Result<()> {
        if self.matrices.len() <= 1 {
            warn!("pop rejected: only the base matrix remains");
            return Err(TransformError::StackUnderflow);
        }

        self.matrices.pop();
        self.pending = PendingTransform::default();
        debug!("popped transform, depth {}", self.matrices.len());
        Ok(())
    }

    /// Number of matrices on the stack, never less than 1
    pub fn size(&self) -> usize {
        self.matrices.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The committed top matrix. Pending state is not included.
    pub fn top(&self) -> &Matrix {
        // The base matrix is never removed
        &self.matrices[self.matrices.len() - 1]
    }

    /// An owned copy of the top matrix
    pub fn copy_top(&self) -> Matrix {
        Transform::copy(self.top())
    }

    pub fn pending(&self) -> &PendingTransform {
        &self.pending
    }

    /// Stage a rotation in radians, replacing any earlier pending rotation
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.pending.rotation = Vector3::new(x, y, z);
    }

    /// Stage a scale, replacing any earlier pending scale
    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.pending.scale = Vector3::new(x, y, z);
    }

    /// Stage a translation, replacing any earlier pending translation
    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.pending.translation = Vector3::new(x, y, z);
    }

    /// Commit the pending state into the top matrix and clear it.
    ///
    /// The top is replaced, not pushed: `top := top · T · R · S`.
    pub fn apply_transform(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_identity() {
            return;
        }

        let index = self.matrices.len() - 1;
        let committed = Transform::multiply(&self.matrices[index], &pending.matrix());
        self.matrices[index] = committed;

        trace!("committed transform:\n{}", Transform::debug_format(&committed));
    }

    /// Drop everything but a fresh identity base
    pub fn reset(&mut self) {
        self.matrices.clear();
        self.matrices.push(Transform::identity());
        self.pending = PendingTransform::default();
    }

    /// Push now; the returned guard restores the current depth when dropped
    pub fn scoped(&mut self) -> Result<ScopedTransform<'_>> {
        let depth = self.matrices.len();
        self.push()?;
        Ok(ScopedTransform { stack: self, depth })
    }

    /// Discard every level above `depth`, never the base
    fn unwind_to(&mut self, depth: usize) {
        self.matrices.truncate(depth.max(1));
        self.pending = PendingTransform::default();
        debug!("unwound transform scope, depth {}", self.matrices.len());
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard returned by [`TransformStack::scoped`].
///
/// Derefs to the stack. On drop the stack is cut back to the depth it had
/// before `scoped()` was called, whatever pushes or pops happened inside, and
/// pending state is cleared.
pub struct ScopedTransform<'a> {
    stack: &'a mut TransformStack,
    depth: usize,
}

impl std::ops::Deref for ScopedTransform<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        &*self.stack
    }
}

impl std::ops::DerefMut for ScopedTransform<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        &mut *self.stack
    }
}

impl Drop for ScopedTransform<'_> {
    fn drop(&mut self) {
        self.stack.unwind_to(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_new_stack_holds_identity() {
        let stack = TransformStack::new();
        assert_eq!(stack.size(), 1);
        assert_eq!(*stack.top(), Transform::identity());
        assert!(stack.pending().is_identity());
    }

    #[test]
    fn test_setters_are_last_write_wins() {
        let mut stack = TransformStack::new();
        stack.set_translation(1.0, 0.0, 0.0);
        stack.set_translation(0.0, 2.0, 0.0);
        assert_eq!(stack.pending().translation, Vector3::new(0.0, 2.0, 0.0));

        stack.apply_transform();
        let p = Transform::transform_point(stack.top(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, [0.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_commit_clears_pending() {
        let mut stack = TransformStack::new();
        stack.set_scale(3.0, 3.0, 3.0);
        stack.set_rotation(0.5, 0.0, 0.0);
        stack.apply_transform();
        assert!(stack.pending().is_identity());
    }

    #[test]
    fn test_push_and_pop_clear_pending() {
        let mut stack = TransformStack::new();
        stack.set_translation(1.0, 1.0, 1.0);
        stack.push().unwrap();
        assert!(stack.pending().is_identity());

        stack.set_scale(2.0, 2.0, 2.0);
        stack.pop().unwrap();
        assert!(stack.pending().is_identity());
        assert_eq!(*stack.top(), Transform::identity());
    }

    #[test]
    fn test_apply_replaces_top() {
        let mut stack = TransformStack::new();
        stack.set_translation(1.0, 0.0, 0.0);
        stack.apply_transform();
        assert_eq!(stack.size(), 1);

        stack.set_translation(1.0, 0.0, 0.0);
        stack.apply_transform();
        let p = Transform::transform_point(stack.top(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, [2.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let mut stack = TransformStack::new();
        stack.set_scale(2.0, 2.0, 2.0);
        stack.set_translation(1.0, 0.0, 0.0);
        stack.apply_transform();

        let p = Transform::transform_point(stack.top(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, [3.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rotation_applies_between_scale_and_translation() {
        let mut stack = TransformStack::new();
        stack.set_scale(2.0, 1.0, 1.0);
        stack.set_rotation(0.0, 0.0, FRAC_PI_2);
        stack.set_translation(0.0, 0.0, 5.0);
        stack.apply_transform();

        // (1,0,0) -> scale (2,0,0) -> rotate about Z (0,2,0) -> translate (0,2,5)
        let p = Transform::transform_point(stack.top(), [1.0, 0.0, 0.0, 1.0]);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(p[1], 2.0, epsilon = 1e-6);
        assert_relative_eq!(p[2], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_child_composes_in_parent_space() {
        let mut stack = TransformStack::new();
        stack.set_rotation(0.0, 0.0, FRAC_PI_2);
        stack.apply_transform();

        stack.push().unwrap();
        stack.set_translation(1.0, 0.0, 0.0);
        stack.apply_transform();

        // The child's +X offset is turned by the parent's rotation
        let p = Transform::transform_point(stack.top(), [0.0, 0.0, 0.0, 1.0]);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(p[1], 1.0, epsilon = 1e-6);

        stack.pop().unwrap();
        let p = Transform::transform_point(stack.top(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_pop_base_fails_without_side_effects() {
        let mut stack = TransformStack::new();
        stack.set_scale(4.0, 4.0, 4.0);

        assert_eq!(stack.pop(), Err(TransformError::StackUnderflow));
        assert_eq!(stack.size(), 1);
        assert_eq!(*stack.top(), Transform::identity());
        assert_eq!(stack.pending().scale, Vector3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_rotation_and_scale_are_last_write_wins() {
        let mut stack = TransformStack::new();
        stack.set_rotation(1.0, 1.0, 1.0);
        stack.set_rotation(0.0, 0.0, FRAC_PI_2);
        stack.set_scale(5.0, 5.0, 5.0);
        stack.set_scale(2.0, 1.0, 1.0);
        assert_eq!(stack.pending().rotation, Vector3::new(0.0, 0.0, FRAC_PI_2));
        assert_eq!(stack.pending().scale, Vector3::new(2.0, 1.0, 1.0));

        stack.apply_transform();
        let expected = Transform::rotation_z(FRAC_PI_2) * Transform::scale_matrix(2.0, 1.0, 1.0);
        assert_relative_eq!(*stack.top(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_default_stack_is_unbounded() {
        let mut stack = TransformStack::new();
        assert_eq!(stack.max_depth(), usize::MAX);
        for _ in 0..200 {
            stack.push().unwrap();
        }
        assert_eq!(stack.size(), 201);
    }

    #[test]
    fn test_overflow_protection() {
        let mut stack = TransformStack::with_config(StackConfig::bounded(2));
        stack.push().unwrap();

        assert_eq!(
            stack.push(),
            Err(TransformError::StackOverflow { max_depth: 2 })
        );
        assert_eq!(stack.size(), 2);
    }

    #[test]
    fn test_zero_depth_config_keeps_base() {
        let mut stack = TransformStack::with_config(StackConfig::bounded(0));
        assert_eq!(stack.max_depth(), 1);
        assert_eq!(stack.size(), 1);
        assert!(stack.push().is_err());
    }

    #[test]
    fn test_copy_top_is_detached() {
        let mut stack = TransformStack::new();
        let before = stack.copy_top();
        stack.set_translation(9.0, 9.0, 9.0);
        stack.apply_transform();
        assert_eq!(before, Transform::identity());
        assert_ne!(*stack.top(), before);
    }

    #[test]
    fn test_scoped_pops_on_drop() {
        let mut stack = TransformStack::new();
        let inner = {
            let mut scope = stack.scoped().unwrap();
            scope.set_translation(5.0, 0.0, 0.0);
            scope.apply_transform();
            assert_eq!(scope.size(), 2);
            scope.copy_top()
        };

        assert_ne!(inner, Transform::identity());
        assert_eq!(stack.size(), 1);
        assert_eq!(*stack.top(), Transform::identity());
    }

    #[test]
    fn test_scope_survives_pop_inside() {
        let mut stack = TransformStack::new();
        stack.push().unwrap();
        stack.set_translation(3.0, 0.0, 0.0);
        stack.apply_transform();
        let parent = stack.copy_top();

        {
            let mut scope = stack.scoped().unwrap();
            scope.pop().unwrap();
            assert_eq!(scope.size(), 2);
        }

        assert_eq!(stack.size(), 2);
        assert_eq!(*stack.top(), parent);
    }

    #[test]
    fn test_scope_discards_unmatched_pushes() {
        let mut stack = TransformStack::new();
        stack.set_scale(2.0, 2.0, 2.0);
        stack.apply_transform();
        let parent = stack.copy_top();

        {
            let mut scope = stack.scoped().unwrap();
            scope.push().unwrap();
            scope.push().unwrap();
            scope.set_translation(1.0, 1.0, 1.0);
            scope.apply_transform();
            scope.set_rotation(0.5, 0.0, 0.0);
            assert_eq!(scope.size(), 4);
        }

        assert_eq!(stack.size(), 1);
        assert_eq!(*stack.top(), parent);
        assert!(stack.pending().is_identity());
    }

    #[test]
    fn test_scope_after_reset_keeps_base() {
        let mut stack = TransformStack::new();
        stack.push().unwrap();
        {
            let mut scope = stack.scoped().unwrap();
            scope.reset();
        }
        assert_eq!(stack.size(), 1);
        assert_eq!(*stack.top(), Transform::identity());
    }

    #[test]
    fn test_reset() {
        let mut stack = TransformStack::new();
        stack.set_translation(1.0, 0.0, 0.0);
        stack.apply_transform();
        stack.push().unwrap();
        stack.push().unwrap();
        stack.set_scale(2.0, 2.0, 2.0);

        stack.reset();
        assert_eq!(stack.size(), 1);
        assert_eq!(*stack.top(), Transform::identity());
        assert!(stack.pending().is_identity());
    }
}
