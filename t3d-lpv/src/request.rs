use bitflags::bitflags;

bitflags! {
    /// Operations requested on a volume; see [`crate::LpvVolume::apply()`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LpvRequest: u8 {
        /// Re-voxelize the scene's geometry.
        const REGEN = 1 << 0;

        /// Recompute direct lighting.
        const INJECT = 1 << 1;

        /// Run one more propagation step.
        const PROPAGATE = 1 << 2;

        /// Upload the volume into the device texture.
        const EXPORT = 1 << 3;
    }
}
