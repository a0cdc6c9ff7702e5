// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the Gridcover crates. See `benches/`.
