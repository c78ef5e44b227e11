
use std::marker::PhantomData;

/// One fixed-layout sub-block repeated N times inside a message payload, N
/// given by a count field in the same message. `parse` is only ever handed a
/// slice of exactly `SIZE` bytes.
pub trait RepeatedBlock: Sized {
	const SIZE:usize;
	fn parse(raw:&[u8]) -> Self;
}

/// Typed accessor over the repeated-block region of a decoded payload. The
/// index is 1-based to match the receiver's own block numbering; an index past
/// the advertised count, or past the bytes actually present, is absence and
/// never an error.
#[derive(Debug, Clone, Copy)]
pub struct BlockRegion<'a, B:RepeatedBlock> {
	payload:&'a [u8],
	offset:usize,
	count:usize,
	block_type:PhantomData<B>,
}

impl<'a, B:RepeatedBlock> BlockRegion<'a, B> {

	pub fn new(payload:&'a [u8], offset:usize, count:usize) -> Self {
		Self{ payload, offset, count, block_type: PhantomData }
	}

	pub fn count(&self) -> usize { self.count }

	pub fn get(&self, index:usize) -> Option<B> {
		if index < 1 || index > self.count { return None; }
		let start:usize = self.offset + (index - 1)*B::SIZE;
		self.payload.get(start..start+B::SIZE).map(B::parse)
	}

	pub fn iter(&self) -> impl Iterator<Item=B> + '_ {
		(1..=self.count).filter_map(move |i| self.get(i))
	}

}
