//! Empty types, one per family. They support nothing beyond moving and
//! dropping, so every report line is a skip notice or an absence check.

use std::marker::PhantomData;

pub struct StubArray<T>(PhantomData<T>);

pub struct StubUnique<T>(PhantomData<T>);

pub struct StubShared<T>(PhantomData<T>);
