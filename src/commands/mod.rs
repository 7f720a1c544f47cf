// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod dashboard;
pub mod expenses;
pub mod exporter;
pub mod products;
pub mod sales;
pub mod settings;
