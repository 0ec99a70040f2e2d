/// Recommended error type for a scenario `main` function and any shared behaviour code written
/// for hooks. This type is compatible with the [crate::definition::HookResult] type so you can
/// use `?` to propagate errors.
pub type RampResult<T> = anyhow::Result<T>;
