// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::err::{PositionOutOfRangeError, RegistryError};
use quay_plan_core::space::{PierLength, PierPosition};
use quay_plan_model::{id::StayId, stay::Stay};
use std::collections::HashMap;

/// The authoritative set of stays last loaded from the source.
#[derive(Debug, Clone)]
pub struct BerthRegistry {
    pier_length: PierLength,
    stays: Vec<Stay>,
    index: HashMap<StayId, usize>,
}

impl BerthRegistry {
    pub fn new(pier_length: PierLength) -> Self {
        Self {
            pier_length,
            stays: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[inline]
    pub fn pier_length(&self) -> PierLength {
        self.pier_length
    }

    /// Replaces the registry contents. On error the previous contents are
    /// kept.
    pub fn load(&mut self, stays: Vec<Stay>) -> Result<(), RegistryError> {
        let pier = PierPosition::new(self.pier_length.value());
        let mut index = HashMap::with_capacity(stays.len());
        for (i, stay) in stays.iter().enumerate() {
            let pos = stay.docking().pos();
            if pos < PierPosition::zero() || pos > pier {
                return Err(PositionOutOfRangeError::new(stay.id(), pos, self.pier_length).into());
            }
            if index.insert(stay.id(), i).is_some() {
                return Err(RegistryError::DuplicateStayId(stay.id()));
            }
        }
        self.stays = stays;
        self.index = index;
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: StayId) -> Option<&Stay> {
        self.index.get(&id).map(|&i| &self.stays[i])
    }

    #[inline]
    pub fn contains(&self, id: StayId) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stays.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Stay> {
        self.stays.iter()
    }

    #[inline]
    pub fn stays(&self) -> &[Stay] {
        &self.stays
    }

    /// A fresh owned copy of every stay, in load order.
    #[inline]
    pub fn snapshot(&self) -> Vec<Stay> {
        self.stays.clone()
    }
}
