#![cfg(feature="serde")]
use super::series::{BinRecord, BinSeries};

use std::marker::PhantomData;
use std::fmt;

use serde::{de, de::{Deserializer, SeqAccess, Visitor}, ser::{Serialize, SerializeSeq, Serializer}, Deserialize};

impl Serialize for BinSeries {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where S: Serializer {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for bin in self.iter() {
            seq.serialize_element(bin)?;
        }
        seq.end()
    }
}

struct BinSeriesVisitor {
    marker: PhantomData<fn() -> BinSeries>
}

impl BinSeriesVisitor {
    fn new() -> Self {
        BinSeriesVisitor {
            marker: PhantomData
        }
    }
}

impl<'de> Visitor<'de> for BinSeriesVisitor {
    type Value = BinSeries;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of bin records")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut bins: Vec<BinRecord> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(bin) = access.next_element()? {
            bins.push(bin);
        }
        BinSeries::new(bins).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for BinSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(BinSeriesVisitor::new())
    }
}
